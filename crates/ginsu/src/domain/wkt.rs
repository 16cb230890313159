//! Well-known text reader and writer
//!
//! Output uses the usual spacing, e.g.
//! `POLYGON ((0 0, 10 0, 10 10, 0 0))` and `MULTIPOINT ((1 2), (3 4))`.
//! The reader accepts any case, optional Z/M dimension tags (extra ordinates
//! are dropped) and both `MULTIPOINT (1 2, 3 4)` and `MULTIPOINT ((1 2))`.
//! A point cannot be empty, so `POINT EMPTY` reads as an empty multipoint and
//! writes back as `MULTIPOINT EMPTY`.

use geo_types::{
    Coord, Geometry, GeometryCollection, Line, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, Rect, Triangle,
};

use crate::error::{GinsuError, Result};

/// Serialize a geometry as WKT
pub trait ToWkt {
    fn write_wkt(&self, out: &mut String);

    fn to_wkt(&self) -> String {
        let mut out = String::new();
        self.write_wkt(&mut out);
        out
    }
}

fn write_number(value: f64, out: &mut String) {
    // -0 prints as "-0"
    if value == 0.0 {
        out.push('0');
    } else {
        out.push_str(&value.to_string());
    }
}

fn write_coord(coord: &Coord<f64>, out: &mut String) {
    write_number(coord.x, out);
    out.push(' ');
    write_number(coord.y, out);
}

fn write_coords(coords: &[Coord<f64>], out: &mut String) {
    out.push('(');
    for (i, coord) in coords.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_coord(coord, out);
    }
    out.push(')');
}

fn write_list<T>(items: &[T], out: &mut String, write: impl Fn(&T, &mut String)) {
    out.push('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write(item, out);
    }
    out.push(')');
}

fn write_polygon_text(polygon: &Polygon<f64>, out: &mut String) {
    if polygon.exterior().0.is_empty() {
        out.push_str("EMPTY");
        return;
    }
    out.push('(');
    write_coords(&polygon.exterior().0, out);
    for hole in polygon.interiors() {
        out.push_str(", ");
        write_coords(&hole.0, out);
    }
    out.push(')');
}

impl ToWkt for Point<f64> {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("POINT (");
        write_coord(&self.0, out);
        out.push(')');
    }
}

impl ToWkt for LineString<f64> {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("LINESTRING ");
        if self.0.is_empty() {
            out.push_str("EMPTY");
        } else {
            write_coords(&self.0, out);
        }
    }
}

impl ToWkt for Line<f64> {
    fn write_wkt(&self, out: &mut String) {
        LineString(vec![self.start, self.end]).write_wkt(out);
    }
}

impl ToWkt for Polygon<f64> {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("POLYGON ");
        write_polygon_text(self, out);
    }
}

impl ToWkt for Rect<f64> {
    fn write_wkt(&self, out: &mut String) {
        self.to_polygon().write_wkt(out);
    }
}

impl ToWkt for Triangle<f64> {
    fn write_wkt(&self, out: &mut String) {
        self.to_polygon().write_wkt(out);
    }
}

impl ToWkt for MultiPoint<f64> {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("MULTIPOINT ");
        if self.0.is_empty() {
            out.push_str("EMPTY");
        } else {
            write_list(&self.0, out, |point, out| write_coords(&[point.0], out));
        }
    }
}

impl ToWkt for MultiLineString<f64> {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("MULTILINESTRING ");
        if self.0.is_empty() {
            out.push_str("EMPTY");
        } else {
            write_list(&self.0, out, |line, out| write_coords(&line.0, out));
        }
    }
}

impl ToWkt for MultiPolygon<f64> {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("MULTIPOLYGON ");
        if self.0.is_empty() {
            out.push_str("EMPTY");
        } else {
            write_list(&self.0, out, write_polygon_text);
        }
    }
}

impl ToWkt for GeometryCollection<f64> {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("GEOMETRYCOLLECTION ");
        if self.0.is_empty() {
            out.push_str("EMPTY");
        } else {
            write_list(&self.0, out, |geometry, out| geometry.write_wkt(out));
        }
    }
}

impl ToWkt for Geometry<f64> {
    fn write_wkt(&self, out: &mut String) {
        match self {
            Geometry::Point(g) => g.write_wkt(out),
            Geometry::Line(g) => g.write_wkt(out),
            Geometry::LineString(g) => g.write_wkt(out),
            Geometry::Polygon(g) => g.write_wkt(out),
            Geometry::MultiPoint(g) => g.write_wkt(out),
            Geometry::MultiLineString(g) => g.write_wkt(out),
            Geometry::MultiPolygon(g) => g.write_wkt(out),
            Geometry::GeometryCollection(g) => g.write_wkt(out),
            Geometry::Rect(g) => g.write_wkt(out),
            Geometry::Triangle(g) => g.write_wkt(out),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    Open,
    Close,
    Comma,
    End,
}

struct Parser<'a> {
    text: &'a str,
    position: usize,
    peeked: Option<(Token, usize)>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            position: 0,
            peeked: None,
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        Err(GinsuError::Parse {
            position: self.position,
            message: message.into(),
        })
    }

    fn scan(&mut self) -> Result<(Token, usize)> {
        let bytes = self.text.as_bytes();
        while self.position < bytes.len() && bytes[self.position].is_ascii_whitespace() {
            self.position += 1;
        }

        let start = self.position;
        let Some(&byte) = bytes.get(start) else {
            return Ok((Token::End, start));
        };

        let token = match byte {
            b'(' => {
                self.position += 1;
                Token::Open
            }
            b')' => {
                self.position += 1;
                Token::Close
            }
            b',' => {
                self.position += 1;
                Token::Comma
            }
            b'-' | b'+' | b'.' | b'0'..=b'9' => {
                while self.position < bytes.len()
                    && matches!(bytes[self.position], b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9')
                {
                    self.position += 1;
                }
                let literal = &self.text[start..self.position];
                match literal.parse::<f64>() {
                    Ok(value) => Token::Number(value),
                    Err(_) => return self.error(format!("invalid number '{literal}'")),
                }
            }
            b if b.is_ascii_alphabetic() => {
                while self.position < bytes.len() && bytes[self.position].is_ascii_alphabetic() {
                    self.position += 1;
                }
                Token::Word(self.text[start..self.position].to_ascii_uppercase())
            }
            other => return self.error(format!("unexpected character '{}'", other as char)),
        };

        Ok((token, start))
    }

    fn next(&mut self) -> Result<Token> {
        match self.peeked.take() {
            Some((token, _)) => Ok(token),
            None => self.scan().map(|(token, _)| token),
        }
    }

    fn peek(&mut self) -> Result<&Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.scan()?);
        }
        match &self.peeked {
            Some((token, _)) => Ok(token),
            None => self.error("unexpected end"),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            self.error(format!("expected {expected:?}, found {token:?}"))
        }
    }

    fn number(&mut self) -> Result<f64> {
        match self.next()? {
            Token::Number(value) => Ok(value),
            token => self.error(format!("expected number, found {token:?}")),
        }
    }

    /// `EMPTY` or the opening parenthesis; returns false on `EMPTY`.
    fn open_or_empty(&mut self) -> Result<bool> {
        match self.next()? {
            Token::Open => Ok(true),
            Token::Word(word) if word == "EMPTY" => Ok(false),
            token => self.error(format!("expected '(' or EMPTY, found {token:?}")),
        }
    }

    /// Continue a list: true after a comma, false after the closing parenthesis.
    fn more(&mut self) -> Result<bool> {
        match self.next()? {
            Token::Comma => Ok(true),
            Token::Close => Ok(false),
            token => self.error(format!("expected ',' or ')', found {token:?}")),
        }
    }

    fn coord(&mut self) -> Result<Coord<f64>> {
        let x = self.number()?;
        let y = self.number()?;
        while matches!(self.peek()?, Token::Number(_)) {
            self.number()?;
        }
        Ok(Coord { x, y })
    }

    fn coords(&mut self) -> Result<Vec<Coord<f64>>> {
        let mut coords = Vec::new();
        if !self.open_or_empty()? {
            return Ok(coords);
        }
        loop {
            coords.push(self.coord()?);
            if !self.more()? {
                return Ok(coords);
            }
        }
    }

    fn polygon_text(&mut self) -> Result<Polygon<f64>> {
        if !self.open_or_empty()? {
            return Ok(Polygon::new(LineString(Vec::new()), Vec::new()));
        }
        let mut rings = Vec::new();
        loop {
            rings.push(LineString(self.coords()?));
            if !self.more()? {
                break;
            }
        }
        let mut rings = rings.into_iter();
        let exterior = rings.next().unwrap_or_else(|| LineString(Vec::new()));
        Ok(Polygon::new(exterior, rings.collect()))
    }

    fn point_text(&mut self) -> Result<Option<Point<f64>>> {
        if !self.open_or_empty()? {
            return Ok(None);
        }
        let coord = self.coord()?;
        self.expect(Token::Close)?;
        Ok(Some(Point(coord)))
    }

    fn list<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut items = Vec::new();
        if !self.open_or_empty()? {
            return Ok(items);
        }
        loop {
            items.push(item(self)?);
            if !self.more()? {
                return Ok(items);
            }
        }
    }

    fn skip_dimension_tag(&mut self) -> Result<()> {
        if let Token::Word(word) = self.peek()? {
            if matches!(word.as_str(), "Z" | "M" | "ZM") {
                self.next()?;
            }
        }
        Ok(())
    }

    fn geometry(&mut self) -> Result<Geometry<f64>> {
        let tag = match self.next()? {
            Token::Word(word) => word,
            token => return self.error(format!("expected geometry type, found {token:?}")),
        };
        self.skip_dimension_tag()?;

        let geometry = match tag.as_str() {
            "POINT" => match self.point_text()? {
                Some(point) => Geometry::Point(point),
                // no empty point in geo_types
                None => Geometry::MultiPoint(MultiPoint(Vec::new())),
            },
            "LINESTRING" => Geometry::LineString(LineString(self.coords()?)),
            "POLYGON" => Geometry::Polygon(self.polygon_text()?),
            "MULTIPOINT" => {
                let points = self.list(|parser| {
                    if matches!(parser.peek()?, Token::Number(_)) {
                        parser.coord().map(|c| Some(Point(c)))
                    } else {
                        parser.point_text()
                    }
                })?;
                Geometry::MultiPoint(MultiPoint(points.into_iter().flatten().collect()))
            }
            "MULTILINESTRING" => {
                let lines = self.list(|parser| parser.coords().map(LineString))?;
                Geometry::MultiLineString(MultiLineString(lines))
            }
            "MULTIPOLYGON" => {
                let polygons = self.list(Self::polygon_text)?;
                Geometry::MultiPolygon(MultiPolygon(
                    polygons
                        .into_iter()
                        .filter(|p| !p.exterior().0.is_empty())
                        .collect(),
                ))
            }
            "GEOMETRYCOLLECTION" => {
                let geometries = self.list(Self::geometry)?;
                Geometry::GeometryCollection(GeometryCollection(geometries))
            }
            other => return self.error(format!("unknown geometry type {other}")),
        };

        Ok(geometry)
    }
}

/// Parse a WKT string
///
/// `POINT EMPTY` yields an empty [`Geometry::MultiPoint`].
pub fn read_wkt(text: &str) -> Result<Geometry<f64>> {
    let mut parser = Parser::new(text);
    let geometry = parser.geometry()?;
    match parser.next()? {
        Token::End => Ok(geometry),
        token => parser.error(format!("trailing input {token:?}")),
    }
}

/// Parse a polygonal WKT, promoting single polygons
pub fn read_multi_polygon(text: &str) -> Result<MultiPolygon<f64>> {
    match read_wkt(text)? {
        Geometry::Polygon(polygon) if polygon.exterior().0.is_empty() => Ok(MultiPolygon(Vec::new())),
        Geometry::Polygon(polygon) => Ok(MultiPolygon(vec![polygon])),
        Geometry::MultiPolygon(multi) => Ok(multi),
        Geometry::GeometryCollection(collection) if collection.0.is_empty() => {
            Ok(MultiPolygon(Vec::new()))
        }
        other => Err(GinsuError::InvalidArgument(format!(
            "expected polygonal geometry, found {}",
            other.to_wkt()
        ))),
    }
}

pub fn read_polygon(text: &str) -> Result<Polygon<f64>> {
    match read_wkt(text)? {
        Geometry::Polygon(polygon) => Ok(polygon),
        other => Err(GinsuError::InvalidArgument(format!(
            "expected polygon, found {}",
            other.to_wkt()
        ))),
    }
}

/// Parse a lineal WKT, promoting single line strings
pub fn read_multi_line_string(text: &str) -> Result<MultiLineString<f64>> {
    match read_wkt(text)? {
        Geometry::LineString(line) => Ok(MultiLineString(vec![line])),
        Geometry::MultiLineString(multi) => Ok(multi),
        other => Err(GinsuError::InvalidArgument(format!(
            "expected lineal geometry, found {}",
            other.to_wkt()
        ))),
    }
}

/// Parse a puntal WKT, promoting single points
pub fn read_multi_point(text: &str) -> Result<MultiPoint<f64>> {
    match read_wkt(text)? {
        Geometry::Point(point) => Ok(MultiPoint(vec![point])),
        Geometry::MultiPoint(multi) => Ok(multi),
        other => Err(GinsuError::InvalidArgument(format!(
            "expected puntal geometry, found {}",
            other.to_wkt()
        ))),
    }
}
