// src/platform.rs

//! Host platform capability descriptor
//!
//! The host is probed once per run with [`HostPlatform::detect`] and the
//! resulting value is handed to every recipe hook. Hooks never look at
//! `std::env::consts` or `PATH` themselves, which keeps them testable
//! against any platform by constructing the descriptor directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::debug;

/// Operating system family
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Os {
    Linux,
    Windows,
    Macos,
    Other,
}

impl Os {
    /// The OS this binary was compiled for
    pub fn current() -> Self {
        match std::env::consts::OS {
            "linux" => Self::Linux,
            "windows" => Self::Windows,
            "macos" => Self::Macos,
            _ => Self::Other,
        }
    }
}

/// What the host can do, as far as recipe hooks care
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostPlatform {
    /// Operating system family
    pub os: Os,
    /// CPU architecture (`x86_64`, `aarch64`, ...)
    pub arch: String,
    /// An APT based system package installer is available
    pub has_apt: bool,
}

impl HostPlatform {
    /// Create a descriptor without an APT installer
    pub fn new(os: Os, arch: impl Into<String>) -> Self {
        Self {
            os,
            arch: arch.into(),
            has_apt: false,
        }
    }

    /// Probe the running host
    pub fn detect() -> Self {
        let os = Os::current();
        let has_apt = os == Os::Linux
            && which::which("apt-get").is_ok()
            && which::which("dpkg-query").is_ok();

        let platform = Self {
            os,
            arch: std::env::consts::ARCH.to_string(),
            has_apt,
        };
        debug!("Detected host platform: {}", platform);
        platform
    }

    /// Linux host with apt-get and dpkg-query available
    pub fn linux_apt() -> Self {
        Self {
            has_apt: true,
            ..Self::new(Os::Linux, "x86_64")
        }
    }

    /// Linux host without an APT installer (Fedora, Arch, ...)
    pub fn linux() -> Self {
        Self::new(Os::Linux, "x86_64")
    }

    /// 64-bit Windows host
    pub fn windows() -> Self {
        Self::new(Os::Windows, "x86_64")
    }

    pub fn is_linux(&self) -> bool {
        self.os == Os::Linux
    }

    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Linux with an APT installer
    pub fn has_apt(&self) -> bool {
        self.is_linux() && self.has_apt
    }

    /// Check whether a recipe condition holds on this host
    pub fn satisfies(&self, condition: Condition) -> bool {
        match condition {
            Condition::Always => true,
            Condition::Linux => self.is_linux(),
            Condition::LinuxApt => self.has_apt(),
            Condition::Windows => self.is_windows(),
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)?;
        if self.has_apt() {
            write!(f, " (apt)")?;
        }
        Ok(())
    }
}

/// Platform predicate attached to recipe sections and patches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    #[default]
    Always,
    Linux,
    LinuxApt,
    Windows,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Linux => "linux",
            Self::LinuxApt => "linux-apt",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
