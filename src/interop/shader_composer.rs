use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use super::STRUCTS_WGSL;
use crate::error::TressFxError;

/// Import path of the record declarations inside composed shaders.
pub const STRUCTS_IMPORT_PATH: &str = "tressfx::structs";

/// Wraps `naga_oil::compose::Composer` to provide shader composition with `#import` support.
///
/// The record declarations are registered at construction time. Simulation
/// shaders use `#import tressfx::structs::{StrandIndex, SphereCollider}` to
/// pull them in. The composer produces `naga::Module` IR directly, skipping
/// WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Composer with [`STRUCTS_IMPORT_PATH`] registered.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::Shader`] if the record module fails to
    /// register.
    pub fn new() -> Result<Self, TressFxError> {
        let mut composer = Composer::default();
        let source =
            format!("#define_import_path {STRUCTS_IMPORT_PATH}\n\n{STRUCTS_WGSL}");

        let registered = composer
            .add_composable_module(ComposableModuleDescriptor {
                source: &source,
                file_path: "modules/tressfx_structs.wgsl",
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .map(|_| ());
        if let Err(e) = registered {
            return Err(TressFxError::Shader(format!(
                "failed to register {STRUCTS_IMPORT_PATH}: {e}"
            )));
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import` directives)
    /// into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, TressFxError> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu shader module.
    /// Useful for testing shader composition without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, TressFxError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                TressFxError::Shader(format!(
                    "failed to compose shader '{file_path}': {e}"
                ))
            })
    }
}
