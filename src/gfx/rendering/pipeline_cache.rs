//! Render pipeline creation and caching for wgpu
//!
//! Pipelines are created lazily the first time a shader pair is drawn with and
//! are cached by the pair of programs and the vertex stride.

use std::collections::HashMap;
use wgpu::*;

use crate::error::RenderError;
use crate::gfx::device::ShaderId;
use crate::gfx::resources::texture_resource::TextureResource;
use crate::gfx::scene::vertex::Vertex;

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub primitive_topology: PrimitiveTopology,
    pub front_face: FrontFace,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub color_format: TextureFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            primitive_topology: PrimitiveTopology::TriangleList,
            // Geometry is authored clockwise in a left-handed space
            front_face: FrontFace::Cw,
            cull_mode: Some(Face::Back),
            depth_format: Some(TextureResource::DEPTH_FORMAT),
            color_format: TextureFormat::Bgra8Unorm,
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Sets the color target format (builder pattern)
    ///
    /// # Arguments
    /// * `format` - Format of the surface the pipeline renders into
    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_format = format;
        self
    }

    pub fn with_depth_format(mut self, format: Option<TextureFormat>) -> Self {
        self.depth_format = format;
        self
    }
}

/// Cache key: vertex program, pixel program, vertex stride
pub type PipelineKey = (ShaderId, ShaderId, u32);

/// Lazily creates and caches render pipelines per shader pair
pub struct PipelineCache {
    config: PipelineConfig,
    layout: PipelineLayout,
    pipelines: HashMap<PipelineKey, RenderPipeline>,
}

impl PipelineCache {
    /// Creates a new pipeline cache
    ///
    /// # Arguments
    /// * `device` - Device to create the shared pipeline layout on
    /// * `bind_group_layouts` - Layouts for groups 0 (per frame), 1 (per draw) and 2 (textures)
    /// * `config` - Render state shared by every cached pipeline
    pub fn new(
        device: &Device,
        bind_group_layouts: &[&BindGroupLayout],
        config: PipelineConfig,
    ) -> Self {
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", config.label)),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        Self {
            config,
            layout,
            pipelines: HashMap::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Gets or creates the pipeline for a shader pair
    pub fn get_or_create(
        &mut self,
        device: &Device,
        key: PipelineKey,
        vertex: &ShaderModule,
        pixel: &ShaderModule,
    ) -> Result<RenderPipeline, RenderError> {
        if let Some(pipeline) = self.pipelines.get(&key) {
            return Ok(pipeline.clone());
        }

        let pipeline = self.create_pipeline(device, key, vertex, pixel)?;
        log::debug!(
            "Created pipeline for shaders {:?}/{:?} (stride {})",
            key.0,
            key.1,
            key.2
        );
        self.pipelines.insert(key, pipeline.clone());
        Ok(pipeline)
    }

    /// Drops every cached pipeline, e.g. after the surface format changes
    pub fn clear(&mut self) {
        self.pipelines.clear();
    }

    fn create_pipeline(
        &self,
        device: &Device,
        key: PipelineKey,
        vertex: &ShaderModule,
        pixel: &ShaderModule,
    ) -> Result<RenderPipeline, RenderError> {
        let (_, _, stride) = key;
        let vertex_buffers = [VertexBufferLayout {
            array_stride: stride as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &Vertex::ATTRIBUTES,
        }];

        let color_targets = [Some(ColorTargetState {
            format: self.config.color_format,
            blend: Some(BlendState::REPLACE),
            write_mask: ColorWrites::ALL,
        })];

        let depth_stencil = self.config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        device.push_error_scope(ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&self.config.label),
            layout: Some(&self.layout),
            vertex: VertexState {
                module: vertex,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: pixel,
                entry_point: Some("fs_main"),
                targets: &color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: self.config.primitive_topology,
                strip_index_format: None,
                front_face: self.config.front_face,
                cull_mode: self.config.cull_mode,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Backend(format!(
                "pipeline for shaders {:?}/{:?}: {}",
                key.0, key.1, error
            )));
        }

        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_clockwise_front_faces() {
        let config = PipelineConfig::default();
        assert_eq!(config.front_face, FrontFace::Cw);
        assert_eq!(config.cull_mode, Some(Face::Back));
        assert_eq!(config.depth_format, Some(TextureResource::DEPTH_FORMAT));
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::default()
            .with_label("Wireframe")
            .with_cull_mode(None)
            .with_color_format(TextureFormat::Rgba8Unorm)
            .with_depth_format(None);
        assert_eq!(config.label, "Wireframe");
        assert_eq!(config.cull_mode, None);
        assert_eq!(config.color_format, TextureFormat::Rgba8Unorm);
        assert!(config.depth_format.is_none());
    }
}
