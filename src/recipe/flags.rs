// src/recipe/flags.rs

//! Typed OGRE build flag table
//!
//! Every CMake option the recipe controls is a named, typed field. The
//! table is rendered by [`OgreFlags::write_definitions`], which assigns
//! each field to the definitions object one by one, so a flag cannot be
//! declared without its value reaching the configure step.

use crate::recipe::kitchen::CMakeDefinitions;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Threading backend for `OGRE_CONFIG_THREAD_PROVIDER`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThreadProvider {
    #[default]
    Std,
    Boost,
    Poco,
    Tbb,
}

/// OGRE-Next CMake feature flags
///
/// Defaults are the values the OGRE recipe ships with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OgreFlags {
    pub build_dependencies: bool,
    pub use_boost: bool,

    pub hlms_pbs: bool,
    pub hlms_unli: bool,
    pub hlms_unlit: bool,

    pub mesh_lod_generator: bool,
    pub overlay: bool,
    pub paging: bool,
    pub planar_reflections: bool,
    pub property: bool,
    pub rt_shader_system: bool,
    pub scene_format: bool,
    pub terrain: bool,
    pub volume: bool,
    pub overlay_imgui: bool,
    pub bites: bool,

    pub csharp: bool,
    pub java: bool,
    pub python: bool,

    pub plugin_pfx: bool,
    pub plugin_stbi: bool,

    pub rendersystem_gl3plus: bool,
    pub rendersystem_vulkan: bool,

    pub samples2: bool,
    pub tests: bool,
    pub tools: bool,

    pub enable_json: bool,
    pub enable_quad_buffer: bool,
    /// `OGRE_CONFIG_THREADS`: 0 = none, 1 = full, 2 = background resources, 3 = background queue
    pub threads: u8,
    pub thread_provider: ThreadProvider,

    pub install_docs: bool,
    pub install_samples: bool,
    pub install_tools: bool,
    pub install_pdb: bool,

    /// `OGRE_RESOURCEMANAGER_STRICT`: 0 = off, 1 = pedantic, 2 = strict
    pub resource_manager_strict: u8,
}

impl Default for OgreFlags {
    fn default() -> Self {
        Self {
            build_dependencies: false,
            use_boost: false,
            hlms_pbs: true,
            hlms_unli: true,
            hlms_unlit: true,
            mesh_lod_generator: true,
            overlay: true,
            paging: true,
            planar_reflections: true,
            property: true,
            rt_shader_system: true,
            scene_format: true,
            terrain: true,
            volume: true,
            overlay_imgui: true,
            bites: true,
            csharp: false,
            java: false,
            python: false,
            plugin_pfx: true,
            plugin_stbi: false,
            rendersystem_gl3plus: true,
            rendersystem_vulkan: true,
            samples2: false,
            tests: false,
            tools: true,
            enable_json: true,
            enable_quad_buffer: false,
            threads: 2,
            thread_provider: ThreadProvider::Std,
            install_docs: false,
            install_samples: false,
            install_tools: true,
            install_pdb: false,
            resource_manager_strict: 0,
        }
    }
}

impl OgreFlags {
    /// Number of CMake definitions [`write_definitions`](Self::write_definitions) emits
    pub const COUNT: usize = 35;

    /// Assign every flag to the CMake definitions object
    pub fn write_definitions(&self, defs: &mut CMakeDefinitions) {
        defs.set_bool("OGRE_BUILD_DEPENDENCIES", self.build_dependencies);
        // Upstream reads this one as a number, not ON/OFF
        defs.set_int("OGRE_USE_BOOST", u8::from(self.use_boost));

        defs.set_bool("OGRE_BUILD_COMPONENT_HLMS_PBS", self.hlms_pbs);
        defs.set_bool("OGRE_BUILD_COMPONENT_HLMS_UNLI", self.hlms_unli);
        defs.set_bool("OGRE_BUILD_COMPONENT_HLMS_UNLIT", self.hlms_unlit);

        defs.set_bool("OGRE_BUILD_COMPONENT_MESHLODGENERATOR", self.mesh_lod_generator);
        defs.set_bool("OGRE_BUILD_COMPONENT_OVERLAY", self.overlay);
        defs.set_bool("OGRE_BUILD_COMPONENT_PAGING", self.paging);
        defs.set_bool("OGRE_BUILD_COMPONENT_PLANAR_REFLECTIONS", self.planar_reflections);
        defs.set_bool("OGRE_BUILD_COMPONENT_PROPERTY", self.property);
        defs.set_bool("OGRE_BUILD_COMPONENT_RTSHADERSYSTEM", self.rt_shader_system);
        defs.set_bool("OGRE_BUILD_COMPONENT_SCENE_FORMAT", self.scene_format);
        defs.set_bool("OGRE_BUILD_COMPONENT_TERRAIN", self.terrain);
        defs.set_bool("OGRE_BUILD_COMPONENT_VOLUME", self.volume);
        defs.set_bool("OGRE_BUILD_COMPONENT_OVERLAY_IMGUI", self.overlay_imgui);
        defs.set_bool("OGRE_BUILD_COMPONENT_BITES", self.bites);

        defs.set_bool("OGRE_BUILD_COMPONENT_CSHARP", self.csharp);
        defs.set_bool("OGRE_BUILD_COMPONENT_JAVA", self.java);
        defs.set_bool("OGRE_BUILD_COMPONENT_PYTHON", self.python);

        defs.set_bool("OGRE_BUILD_PLUGIN_PFX", self.plugin_pfx);
        defs.set_bool("OGRE_BUILD_PLUGIN_STBI", self.plugin_stbi);

        defs.set_bool("OGRE_BUILD_RENDERSYSTEM_GL3PLUS", self.rendersystem_gl3plus);
        defs.set_bool("OGRE_BUILD_RENDERSYSTEM_VULKAN", self.rendersystem_vulkan);

        defs.set_bool("OGRE_BUILD_SAMPLES2", self.samples2);
        defs.set_bool("OGRE_BUILD_TESTS", self.tests);
        defs.set_bool("OGRE_BUILD_TOOLS", self.tools);

        defs.set_bool("OGRE_CONFIG_ENABLE_JSON", self.enable_json);
        defs.set_bool("OGRE_CONFIG_ENABLE_QUAD_BUFFER", self.enable_quad_buffer);
        defs.set_int("OGRE_CONFIG_THREADS", self.threads);
        defs.set("OGRE_CONFIG_THREAD_PROVIDER", self.thread_provider.as_ref());

        defs.set_bool("OGRE_INSTALL_DOCS", self.install_docs);
        defs.set_bool("OGRE_INSTALL_SAMPLES", self.install_samples);
        defs.set_bool("OGRE_INSTALL_TOOLS", self.install_tools);
        defs.set_bool("OGRE_INSTALL_PDB", self.install_pdb);

        defs.set_int("OGRE_RESOURCEMANAGER_STRICT", self.resource_manager_strict);
    }

    /// Check value ranges the type system cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.threads > 3 {
            return Err(format!("threads must be 0..=3, got {}", self.threads));
        }
        if self.resource_manager_strict > 2 {
            return Err(format!(
                "resource_manager_strict must be 0..=2, got {}",
                self.resource_manager_strict
            ));
        }
        if self.thread_provider == ThreadProvider::Boost && !self.use_boost {
            return Err("thread_provider = \"boost\" requires use_boost = true".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(flags: &OgreFlags) -> CMakeDefinitions {
        let mut defs = CMakeDefinitions::new();
        flags.write_definitions(&mut defs);
        defs
    }

    #[test]
    fn test_every_flag_reaches_definitions() {
        let defs = rendered(&OgreFlags::default());
        assert_eq!(defs.len(), OgreFlags::COUNT);

        let expected = [
            ("OGRE_BUILD_DEPENDENCIES", "OFF"),
            ("OGRE_USE_BOOST", "0"),
            ("OGRE_BUILD_COMPONENT_HLMS_PBS", "ON"),
            ("OGRE_BUILD_COMPONENT_HLMS_UNLI", "ON"),
            ("OGRE_BUILD_COMPONENT_HLMS_UNLIT", "ON"),
            ("OGRE_BUILD_COMPONENT_MESHLODGENERATOR", "ON"),
            ("OGRE_BUILD_COMPONENT_OVERLAY", "ON"),
            ("OGRE_BUILD_COMPONENT_PAGING", "ON"),
            ("OGRE_BUILD_COMPONENT_PLANAR_REFLECTIONS", "ON"),
            ("OGRE_BUILD_COMPONENT_PROPERTY", "ON"),
            ("OGRE_BUILD_COMPONENT_RTSHADERSYSTEM", "ON"),
            ("OGRE_BUILD_COMPONENT_SCENE_FORMAT", "ON"),
            ("OGRE_BUILD_COMPONENT_TERRAIN", "ON"),
            ("OGRE_BUILD_COMPONENT_VOLUME", "ON"),
            ("OGRE_BUILD_COMPONENT_OVERLAY_IMGUI", "ON"),
            ("OGRE_BUILD_COMPONENT_BITES", "ON"),
            ("OGRE_BUILD_COMPONENT_CSHARP", "OFF"),
            ("OGRE_BUILD_COMPONENT_JAVA", "OFF"),
            ("OGRE_BUILD_COMPONENT_PYTHON", "OFF"),
            ("OGRE_BUILD_PLUGIN_PFX", "ON"),
            ("OGRE_BUILD_PLUGIN_STBI", "OFF"),
            ("OGRE_BUILD_RENDERSYSTEM_GL3PLUS", "ON"),
            ("OGRE_BUILD_RENDERSYSTEM_VULKAN", "ON"),
            ("OGRE_BUILD_SAMPLES2", "OFF"),
            ("OGRE_BUILD_TESTS", "OFF"),
            ("OGRE_BUILD_TOOLS", "ON"),
            ("OGRE_CONFIG_ENABLE_JSON", "ON"),
            ("OGRE_CONFIG_ENABLE_QUAD_BUFFER", "OFF"),
            ("OGRE_CONFIG_THREADS", "2"),
            ("OGRE_CONFIG_THREAD_PROVIDER", "std"),
            ("OGRE_INSTALL_DOCS", "OFF"),
            ("OGRE_INSTALL_SAMPLES", "OFF"),
            ("OGRE_INSTALL_TOOLS", "ON"),
            ("OGRE_INSTALL_PDB", "OFF"),
            ("OGRE_RESOURCEMANAGER_STRICT", "0"),
        ];
        assert_eq!(expected.len(), OgreFlags::COUNT);

        for (key, value) in expected {
            assert_eq!(defs.get(key), Some(value), "flag {}", key);
        }
    }

    #[test]
    fn test_changed_values_are_rendered() {
        let flags = OgreFlags {
            tests: true,
            threads: 0,
            thread_provider: ThreadProvider::Tbb,
            use_boost: true,
            ..OgreFlags::default()
        };
        let defs = rendered(&flags);
        assert_eq!(defs.get("OGRE_BUILD_TESTS"), Some("ON"));
        assert_eq!(defs.get("OGRE_CONFIG_THREADS"), Some("0"));
        assert_eq!(defs.get("OGRE_CONFIG_THREAD_PROVIDER"), Some("tbb"));
        assert_eq!(defs.get("OGRE_USE_BOOST"), Some("1"));
    }

    #[test]
    fn test_partial_table_uses_defaults() {
        let flags: OgreFlags = toml::from_str("samples2 = true").unwrap();
        assert!(flags.samples2);
        assert!(flags.hlms_pbs);
        assert_eq!(flags.threads, 2);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let result: Result<OgreFlags, _> = toml::from_str("hlms_pbss = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_ranges() {
        assert!(OgreFlags::default().validate().is_ok());

        let flags = OgreFlags { threads: 4, ..OgreFlags::default() };
        assert!(flags.validate().is_err());

        let flags = OgreFlags { resource_manager_strict: 3, ..OgreFlags::default() };
        assert!(flags.validate().is_err());

        let flags = OgreFlags {
            thread_provider: ThreadProvider::Boost,
            ..OgreFlags::default()
        };
        assert!(flags.validate().is_err());
    }
}
