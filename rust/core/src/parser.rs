// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face-list (Wavefront OBJ) parser using nom
//!
//! Line-oriented: every statement lives on its own line. Only geometry
//! statements are interpreted (`v`, `vt`, `vn`, `f`); grouping, material and
//! smoothing statements are skipped.
//!
//! Indices are kept in the format's native 1-based numbering with `0`
//! meaning "absent". Negative (relative) indices are resolved against the
//! pool sizes seen so far, so the output only ever contains absolute indices.

use memchr::{memchr, memchr_iter};
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::many1,
    number::complete::recognize_float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use smallvec::SmallVec;
use tracing::debug;

use crate::error::{Error, Result};

/// Corner of a parsed face, 1-based, `0` = absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedTriplet {
    /// Position index
    pub v: usize,
    /// Texture coordinate index
    pub vt: usize,
    /// Normal index
    pub vn: usize,
}

impl ParsedTriplet {
    #[inline]
    pub fn new(v: usize, vt: usize, vn: usize) -> Self {
        Self { v, vt, vn }
    }
}

/// Parsed face (most faces are triangles or quads)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedFace {
    pub triplets: SmallVec<[ParsedTriplet; 4]>,
}

/// Raw content of a face-list file
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedMesh {
    pub vertices: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex colors from the `v x y z r g b` extension
    pub colors: Vec<[f32; 4]>,
    pub faces: Vec<ParsedFace>,
}

impl ParsedMesh {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }
}

/// Raw (possibly negative) corner indices as written in the file
type RawCorner = (i64, Option<i64>, Option<i64>);

/// One interpreted line
enum Statement {
    Vertex(Vec<f32>),
    TexCoord(Vec<f32>),
    Normal(Vec<f32>),
    Face(Vec<RawCorner>),
    Skip,
}

/// Parse float: 1, -1.5, 0.25e-3
fn float(input: &str) -> IResult<&str, f32> {
    map_res(recognize_float, |s: &str| fast_float::parse::<f32, _>(s))(input)
}

/// Whitespace separated list of floats following a keyword
fn floats(input: &str) -> IResult<&str, Vec<f32>> {
    many1(preceded(space1, float))(input)
}

/// Parse index: 3, -1
fn index(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

/// Parse face corner: v, v/vt, v//vn, v/vt/vn
fn corner(input: &str) -> IResult<&str, RawCorner> {
    map(
        tuple((
            index,
            opt(preceded(char('/'), opt(index))),
            opt(preceded(char('/'), index)),
        )),
        |(v, vt, vn)| (v, vt.flatten(), vn),
    )(input)
}

fn corners(input: &str) -> IResult<&str, Vec<RawCorner>> {
    many1(preceded(space1, corner))(input)
}

/// Parse a statement body for a known keyword, requiring the whole line to match
fn statement<'a, O>(
    body: &'a str,
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> std::result::Result<O, String> {
    all_consuming(terminated(parser, space0))(body)
        .map(|(_, out)| out)
        .map_err(|e| format!("{}", e))
}

fn parse_line(line: &str) -> std::result::Result<Statement, String> {
    let keyword: IResult<&str, &str> = take_till1(|c: char| c.is_whitespace())(line);
    let (body, keyword) = match keyword {
        Ok(split) => split,
        Err(_) => return Ok(Statement::Skip),
    };

    match keyword {
        "v" => statement(body, floats).map(Statement::Vertex),
        "vt" => statement(body, floats).map(Statement::TexCoord),
        "vn" => statement(body, floats).map(Statement::Normal),
        "f" => statement(body, corners).map(Statement::Face),
        _ => Ok(Statement::Skip),
    }
}

/// Resolve a raw index against the current pool size
///
/// Positive indices are kept, negative ones count back from the end.
fn resolve_index(raw: i64, pool_len: usize, line: usize, pool: &str) -> Result<usize> {
    if raw > 0 {
        return Ok(raw as usize);
    }
    if raw == 0 {
        return Err(Error::parse(line, format!("{} index 0 is not allowed", pool)));
    }
    let back = raw.unsigned_abs() as usize;
    if back > pool_len {
        return Err(Error::parse(
            line,
            format!("relative {} index {} before start of pool", pool, raw),
        ));
    }
    Ok(pool_len + 1 - back)
}

fn resolve_optional(
    raw: Option<i64>,
    pool_len: usize,
    line: usize,
    pool: &str,
) -> Result<usize> {
    match raw {
        Some(raw) => resolve_index(raw, pool_len, line, pool),
        None => Ok(0),
    }
}

/// Parse face-list content
pub fn parse_obj(content: &str) -> Result<ParsedMesh> {
    let mut mesh = ParsedMesh::default();

    for (number, raw_line) in content.lines().enumerate() {
        let line_no = number + 1;
        let line = match memchr(b'#', raw_line.as_bytes()) {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let stmt = parse_line(line).map_err(|msg| Error::parse(line_no, msg))?;

        match stmt {
            Statement::Vertex(values) => match values.as_slice() {
                [x, y, z] | [x, y, z, _] => mesh.vertices.push([*x, *y, *z]),
                [x, y, z, r, g, b] => {
                    mesh.vertices.push([*x, *y, *z]);
                    mesh.colors.push([*r, *g, *b, 1.0]);
                }
                [x, y, z, r, g, b, a] => {
                    mesh.vertices.push([*x, *y, *z]);
                    mesh.colors.push([*r, *g, *b, *a]);
                }
                _ => {
                    return Err(Error::parse(
                        line_no,
                        format!("vertex expects 3, 4, 6 or 7 values, got {}", values.len()),
                    ))
                }
            },
            Statement::TexCoord(values) => match values.as_slice() {
                [u] => mesh.tex_coords.push([*u, 0.0]),
                [u, v] | [u, v, _] => mesh.tex_coords.push([*u, *v]),
                _ => {
                    return Err(Error::parse(
                        line_no,
                        format!("texture coordinate expects 1 to 3 values, got {}", values.len()),
                    ))
                }
            },
            Statement::Normal(values) => match values.as_slice() {
                [x, y, z] => mesh.normals.push([*x, *y, *z]),
                _ => {
                    return Err(Error::parse(
                        line_no,
                        format!("normal expects 3 values, got {}", values.len()),
                    ))
                }
            },
            Statement::Face(raw) => {
                if raw.len() < 3 {
                    return Err(Error::parse(
                        line_no,
                        format!("face needs at least 3 corners, got {}", raw.len()),
                    ));
                }
                let mut triplets = SmallVec::with_capacity(raw.len());
                for (v, vt, vn) in raw {
                    triplets.push(ParsedTriplet::new(
                        resolve_index(v, mesh.vertices.len(), line_no, "vertex")?,
                        resolve_optional(vt, mesh.tex_coords.len(), line_no, "texture")?,
                        resolve_optional(vn, mesh.normals.len(), line_no, "normal")?,
                    ));
                }
                mesh.faces.push(ParsedFace { triplets });
            }
            Statement::Skip => {}
        }
    }

    if mesh.is_empty() {
        return Err(Error::EmptyModel);
    }

    debug!(
        vertices = mesh.vertices.len(),
        normals = mesh.normals.len(),
        tex_coords = mesh.tex_coords.len(),
        faces = mesh.faces.len(),
        "parsed face-list"
    );

    Ok(mesh)
}

/// Parse face-list content from raw file bytes
pub fn parse_obj_bytes(bytes: &[u8]) -> Result<ParsedMesh> {
    let content = std::str::from_utf8(bytes).map_err(|e| {
        let line = memchr_iter(b'\n', &bytes[..e.valid_up_to()]).count() + 1;
        Error::parse(line, format!("invalid UTF-8: {}", e))
    })?;
    parse_obj(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX_OBJ: &str = "\
# Blender box
mtllib box.mtl
o Cube
v 1.000000 1.000000 -1.000000
v 1.000000 -1.000000 -1.000000
v 1.000000 1.000000 1.000000
v 1.000000 -1.000000 1.000000
v -1.000000 1.000000 -1.000000
v -1.000000 -1.000000 -1.000000
v -1.000000 1.000000 1.000000
v -1.000000 -1.000000 1.000000
vt 0.625000 0.500000
vt 0.875000 0.500000
vt 0.875000 0.750000
vt 0.625000 0.750000
vn 0.0000 1.0000 0.0000
vn 0.0000 0.0000 1.0000
usemtl Material
s off
f 1/1/1 5/2/1 7/3/1 3/4/1
f 4/4/2 3/4/2 7/3/2 8/1/2
";

    #[test]
    fn test_float() {
        assert_eq!(float("1.5"), Ok(("", 1.5)));
        assert_eq!(float("-2e1 x"), Ok((" x", -20.0)));
    }

    #[test]
    fn test_corner_forms() {
        assert_eq!(corner("7"), Ok(("", (7, None, None))));
        assert_eq!(corner("7/2"), Ok(("", (7, Some(2), None))));
        assert_eq!(corner("7//3"), Ok(("", (7, None, Some(3)))));
        assert_eq!(corner("7/2/3"), Ok(("", (7, Some(2), Some(3)))));
        assert_eq!(corner("-1/-2/-3"), Ok(("", (-1, Some(-2), Some(-3)))));
    }

    #[test]
    fn test_parse_box() {
        let mesh = parse_obj(BOX_OBJ).unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.tex_coords.len(), 4);
        assert_eq!(mesh.normals.len(), 2);
        assert!(mesh.colors.is_empty());
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.vertices[4], [-1.0, 1.0, -1.0]);
        assert_eq!(
            mesh.faces[0].triplets.as_slice(),
            &[
                ParsedTriplet::new(1, 1, 1),
                ParsedTriplet::new(5, 2, 1),
                ParsedTriplet::new(7, 3, 1),
                ParsedTriplet::new(3, 4, 1),
            ]
        );
    }

    #[test]
    fn test_missing_attributes_are_zero() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.faces[0].triplets[0], ParsedTriplet::new(1, 0, 1));
        assert_eq!(mesh.faces[1].triplets[2], ParsedTriplet::new(3, 0, 0));
    }

    #[test]
    fn test_relative_indices() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        let v: Vec<usize> = mesh.faces[0].triplets.iter().map(|t| t.v).collect();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_utf8_reports_line_number() {
        match parse_obj_bytes(b"v 0 0 0\nv 1 0 0\no \xff\n") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_vertex_colors() {
        let mesh = parse_obj("v 0 0 0 1 0.5 0\nv 1 0 0 0 0 1 0.25\n").unwrap();
        assert_eq!(mesh.colors, vec![[1.0, 0.5, 0.0, 1.0], [0.0, 0.0, 1.0, 0.25]]);
    }

    #[test]
    fn test_inline_comment_and_tabs() {
        let mesh = parse_obj("v\t0 0 0 # origin\nv 1 0 0\nv 0 1 0\nf 1 2 3   \n").unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.faces.len(), 1);
    }

    #[test]
    fn test_bad_lines_report_line_number() {
        match parse_obj("v 0 0 0\nv 1 0 zz\n") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
        match parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(parse_obj("v 0 0 0\nf 0 1 1\n").is_err());
        assert!(parse_obj("v 0 0 0\nf -2 1 1\n").is_err());
    }

    #[test]
    fn test_empty_model() {
        assert_eq!(parse_obj("# nothing\n\ng group\n"), Err(Error::EmptyModel));
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        assert!(parse_obj_bytes(&[0x76, 0x20, 0xff, 0xfe]).is_err());
    }
}
