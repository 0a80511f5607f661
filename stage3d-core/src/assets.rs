/// Mesh assets: STL loading (binary and ASCII)
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16},
    sequence::{preceded, tuple},
    IResult,
};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::AssetError;
use crate::geometry::{Mesh, Triangle, Vertex};

const HEADER_LEN: usize = 80;
const FACET_LEN: u64 = 50;

/// Read and parse an STL file
pub fn load_mesh(path: &Path) -> Result<Mesh, AssetError> {
    let data = fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_stl(&data)?;
    info!(path = %path.display(), triangles = mesh.triangles.len(), "Loaded mesh");
    Ok(mesh)
}

/// Load `path` if given, otherwise build the fallback mesh
pub fn load_mesh_or(
    path: Option<&Path>,
    fallback: impl FnOnce() -> Mesh,
) -> Result<Mesh, AssetError> {
    match path {
        Some(path) => load_mesh(path),
        None => Ok(fallback()),
    }
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, AssetError> {
    // Binary files may also start with "solid", so ASCII is only a first guess
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(mesh) => return Ok(mesh),
                Err(ascii_err) => {
                    debug!(error = %ascii_err, "Not ASCII STL, trying binary");
                    return parse_binary_stl(data).map_err(|_| ascii_err);
                }
            }
        }
    }

    parse_binary_stl(data)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, AssetError> {
    let body_start = HEADER_LEN + 4;
    if data.len() < body_start {
        return Err(AssetError::Truncated {
            expected: body_start,
            found: data.len(),
        });
    }

    let facet_count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]);
    let expected = body_start as u64 + facet_count as u64 * FACET_LEN;
    if (data.len() as u64) < expected {
        return Err(AssetError::Truncated {
            expected: expected as usize,
            found: data.len(),
        });
    }

    let (_, triangles) = count(binary_facet, facet_count as usize)(&data[body_start..])
        .map_err(|e| AssetError::Malformed(format!("{e:?}")))?;
    Ok(Mesh { triangles })
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, normal) = le_vector3(input)?;
    let (input, a) = le_vector3(input)?;
    let (input, b) = le_vector3(input)?;
    let (input, c) = le_vector3(input)?;
    // Attribute byte count, unused
    let (input, _) = le_u16(input)?;
    Ok((input, facet(normal, [a, b, c])))
}

fn le_vector3(input: &[u8]) -> IResult<&[u8], [f32; 3]> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, [x, y, z]))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, AssetError> {
    match ascii_solid(input) {
        Ok((rest, mesh)) if rest.trim().is_empty() => Ok(mesh),
        Ok((rest, _)) => Err(AssetError::Malformed(format!(
            "unexpected trailing input: {:.32}",
            rest.trim_start()
        ))),
        Err(e) => Err(AssetError::Malformed(format!("{e:?}"))),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = keyword("solid")(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, triangles) = many0(ascii_facet)(input)?;
    let (input, _) = keyword("endsolid")(input)?;
    let (input, _) = not_line_ending(input)?;
    Ok((input, Mesh { triangles }))
}

fn ascii_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = keyword("facet")(input)?;
    let (input, normal) = preceded(keyword("normal"), ascii_vector3)(input)?;
    let (input, _) = keyword("outer")(input)?;
    let (input, _) = keyword("loop")(input)?;
    let (input, a) = preceded(keyword("vertex"), ascii_vector3)(input)?;
    let (input, b) = preceded(keyword("vertex"), ascii_vector3)(input)?;
    let (input, c) = preceded(keyword("vertex"), ascii_vector3)(input)?;
    let (input, _) = keyword("endloop")(input)?;
    let (input, _) = keyword("endfacet")(input)?;
    Ok((input, facet(normal, [a, b, c])))
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, tag(word))
}

fn ascii_vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, (x, y, z)) = tuple((
        preceded(multispace1, float),
        preceded(multispace1, float),
        preceded(multispace1, float),
    ))(input)?;
    Ok((input, [x, y, z]))
}

fn facet(normal: [f32; 3], corners: [[f32; 3]; 3]) -> Triangle {
    let [nx, ny, nz] = normal;
    let vertex = |[x, y, z]: [f32; 3]| Vertex::new(x, y, z, nx, ny, nz);
    Triangle::new(vertex(corners[0]), vertex(corners[1]), vertex(corners[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TETRA_FACE: &str = "solid marker
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid marker
";

    fn binary_with_one_facet() -> Vec<u8> {
        let mut data = vec![0u8; 80];
        data.extend_from_slice(&1u32.to_le_bytes());
        for value in [0.0f32, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data.extend_from_slice(&0u16.to_le_bytes());
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        // Set triangle count to 0
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.triangles.len(), 0);
    }

    #[test]
    fn test_parse_binary_facet() {
        let mesh = parse_binary_stl(&binary_with_one_facet()).unwrap();
        assert_eq!(mesh.triangles.len(), 1);
        let triangle = &mesh.triangles[0];
        assert_eq!(triangle.vertices[1].position.x, 1.0);
        assert_eq!(triangle.vertices[0].normal.z, 1.0);
    }

    #[test]
    fn test_truncated_binary_is_rejected() {
        let mut data = binary_with_one_facet();
        data.truncate(100);
        match parse_binary_stl(&data) {
            Err(AssetError::Truncated { expected, found }) => {
                assert_eq!(expected, 134);
                assert_eq!(found, 100);
            }
            other => panic!("expected truncation error, got {:?}", other),
        }

        assert!(matches!(parse_binary_stl(&[0u8; 10]), Err(AssetError::Truncated { .. })));
    }

    #[test]
    fn test_parse_ascii() {
        let mesh = parse_ascii_stl(TETRA_FACE).unwrap();
        assert_eq!(mesh.triangles.len(), 1);
        assert_eq!(mesh.triangles[0].vertices[2].position.y, 1.0);
    }

    #[test]
    fn test_malformed_ascii_is_rejected() {
        let broken = TETRA_FACE.replace("endloop", "endlop");
        assert!(matches!(parse_ascii_stl(&broken), Err(AssetError::Malformed(_))));
    }

    #[test]
    fn test_detects_format() {
        assert_eq!(parse_stl(TETRA_FACE.as_bytes()).unwrap().triangles.len(), 1);

        // Binary file whose header happens to start with "solid"
        let mut data = binary_with_one_facet();
        data[..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&data).unwrap().triangles.len(), 1);
    }

    #[test]
    fn test_load_mesh_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TETRA_FACE.as_bytes()).unwrap();

        let mesh = load_mesh(file.path()).unwrap();
        assert_eq!(mesh.triangles.len(), 1);

        let missing = file.path().with_extension("missing");
        assert!(matches!(load_mesh(&missing), Err(AssetError::Io { .. })));
    }

    #[test]
    fn test_fallback_when_no_path() {
        let mesh = load_mesh_or(None, || Mesh::cube(1.0)).unwrap();
        assert_eq!(mesh.triangles.len(), 12);
    }
}
