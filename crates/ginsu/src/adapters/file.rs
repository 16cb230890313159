use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::ports::outbound::GridStore;

/// File-backed cell store.
///
/// Cell `(x, y)` lives in `directory/x/y`, bincode encoded. Column
/// directories are created on the first write into them.
pub struct FileGridStore<G> {
    directory: PathBuf,
    lock: Mutex<()>,
    _cells: PhantomData<fn() -> G>,
}

impl<G> FileGridStore<G> {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            lock: Mutex::new(()),
            _cells: PhantomData,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path(&self, x: usize, y: usize) -> PathBuf {
        self.directory.join(x.to_string()).join(y.to_string())
    }
}

impl<G> GridStore<G> for FileGridStore<G>
where
    G: Serialize + DeserializeOwned,
{
    fn read(&self, x: usize, y: usize) -> Result<Option<G>> {
        let _guard = self.lock.lock();
        let file = match File::open(self.path(x, y)) {
            Ok(file) => file,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(bincode::deserialize_from(BufReader::new(file))?))
    }

    fn write(&self, x: usize, y: usize, value: &G) -> Result<()> {
        let _guard = self.lock.lock();
        let path = self.path(x, y);
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                if let Some(parent) = path.parent() {
                    debug!(directory = %parent.display(), "[ginsu] creating cell directory");
                    std::fs::create_dir_all(parent)?;
                }
                File::create(&path)?
            }
            Err(error) => return Err(error.into()),
        };

        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }
}
