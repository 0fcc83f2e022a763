//! Loading shader programs, models and textures from disk.
//!
//! Models are converted into the engine's left-handed space on import: Z is
//! negated, triangles are rewound clockwise and V is flipped so that texture
//! rows run top to bottom.

use std::path::Path;

use crate::error::AssetError;
use crate::gfx::device::{GraphicsDevice, ShaderDescriptor, ShaderId, ShaderStage, TextureId};
use crate::gfx::geometry::{calculate_face_normals, GeometryData};

fn read_to_string(path: &Path) -> Result<String, AssetError> {
    std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Compiles the WGSL program at `path` for `stage`.
pub fn load_shader(
    device: &dyn GraphicsDevice,
    stage: ShaderStage,
    path: impl AsRef<Path>,
) -> Result<ShaderId, AssetError> {
    let path = path.as_ref();
    let source = read_to_string(path)?;
    let label = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("shader");

    log::debug!("Compiling {:?} program '{}'", stage, path.display());
    let id = device.create_shader(&ShaderDescriptor {
        label,
        stage,
        source: &source,
    })?;
    Ok(id)
}

/// Loads every model in an OBJ file and merges them into one geometry.
pub fn load_obj(path: impl AsRef<Path>) -> Result<GeometryData, AssetError> {
    let path = path.as_ref();
    // tobj folds every I/O failure into one variant, so check up front
    std::fs::metadata(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Model {
        path: path.to_path_buf(),
        source,
    })?;

    let mut geometry = GeometryData::new();
    for model in &models {
        let mesh = &model.mesh;
        let vertex_count = mesh.positions.len() / 3;
        if vertex_count == 0 || mesh.indices.len() < 3 {
            log::debug!("Skipping empty model '{}' in {}", model.name, path.display());
            continue;
        }

        let base = geometry.positions.len() as u32;
        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], -p[2]])
            .collect();

        let mut indices = Vec::with_capacity(mesh.indices.len());
        for triangle in mesh.indices.chunks_exact(3) {
            indices.extend_from_slice(&[triangle[0], triangle[2], triangle[1]]);
        }

        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], -n[2]])
                .collect()
        } else {
            calculate_face_normals(&positions, &indices)
        };

        let uvs: Vec<[f32; 2]> = if mesh.texcoords.len() / 2 == vertex_count {
            mesh.texcoords
                .chunks_exact(2)
                .map(|t| [t[0], 1.0 - t[1]])
                .collect()
        } else {
            vec![[0.0, 0.0]; vertex_count]
        };

        geometry.positions.extend(positions);
        geometry.normals.extend(normals);
        geometry.uvs.extend(uvs);
        geometry.indices.extend(indices.iter().map(|i| i + base));
    }

    if geometry.indices.is_empty() {
        return Err(AssetError::EmptyModel {
            path: path.to_path_buf(),
        });
    }

    log::debug!(
        "Loaded {} ({} models, {} vertices, {} triangles)",
        path.display(),
        models.len(),
        geometry.vertex_count(),
        geometry.triangle_count()
    );
    Ok(geometry)
}

/// Decodes an image file and uploads it as an RGBA8 texture.
pub fn load_texture(
    device: &dyn GraphicsDevice,
    path: impl AsRef<Path>,
) -> Result<TextureId, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes)
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    let (width, height) = image.dimensions();
    let label = path.to_string_lossy();
    let id = device.create_texture_rgba8(&label, width, height, image.as_raw())?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::headless::HeadlessDevice;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("scenery-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_obj_converts_to_left_handed() {
        let path = temp_file(
            "tri.obj",
            b"v 0 0 1\nv 1 0 1\nv 0 1 1\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n",
        );
        let geometry = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.triangle_count(), 1);
        assert!(geometry.positions.iter().all(|p| p[2] == -1.0));
        assert_eq!(geometry.uvs[2], [0.0, 0.0]);
        assert_eq!(geometry.uvs[0], [0.0, 1.0]);

        // Rewound triangle faces -Z (toward a camera looking down +Z)
        for normal in &geometry.normals {
            assert!((normal[2] + 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_load_obj_merges_models() {
        let path = temp_file(
            "two.obj",
            b"o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no b\nv 0 0 2\nv 1 0 2\nv 0 1 2\nf 4 5 6\n",
        );
        let geometry = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(geometry.vertex_count(), 6);
        assert_eq!(geometry.triangle_count(), 2);
        assert!(geometry.indices[3..].iter().all(|&i| i >= 3));
    }

    #[test]
    fn test_missing_files_report_io_errors() {
        let missing = std::env::temp_dir().join("scenery-does-not-exist.obj");
        assert!(matches!(load_obj(&missing), Err(AssetError::Io { .. })));

        let device = HeadlessDevice::new();
        assert!(matches!(
            load_shader(&device, ShaderStage::Vertex, &missing),
            Err(AssetError::Io { .. })
        ));
        assert!(matches!(
            load_texture(&device, &missing),
            Err(AssetError::Io { .. })
        ));
    }

    #[test]
    fn test_obj_without_faces_is_empty() {
        let path = temp_file("empty.obj", b"v 0 0 0\nv 1 0 0\n");
        let result = load_obj(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(AssetError::EmptyModel { .. })));
    }

    #[test]
    fn test_load_shader_uses_requested_stage() {
        let path = temp_file("pixel.wgsl", b"@fragment fn fs_main() {}");
        let device = HeadlessDevice::new();
        let id = load_shader(&device, ShaderStage::Pixel, &path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(device.shader_stage(id), Some(ShaderStage::Pixel));
    }

    #[test]
    fn test_undecodable_image_is_an_image_error() {
        let path = temp_file("bad.png", b"not a png");
        let device = HeadlessDevice::new();
        let result = load_texture(&device, &path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(AssetError::Image { .. })));
    }
}
