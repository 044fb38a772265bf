//! The fixed set of locations an application resolves at startup.

use serde::Serialize;

/// A directory the application reads or writes state in.
///
/// The order is fixed; `PathRole::ALL` lists every role in declaration order
/// and `PathRole::COUNT` sizes the path table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathRole {
    /// Global configuration
    GlobalConfig,
    /// Per-user configuration (queue, favorites, ...)
    UserConfig,
    /// Per-user local data such as language files
    UserLocale,
    /// Various resources (help files etc)
    Resources,
    /// Translations
    Locale,
    /// Default download location
    Downloads,
    /// Default file list location
    FileLists,
    /// XML files for each bundle
    Bundles,
    /// XML files for cached share structure
    ShareCache,
    /// Temp files (viewed files, temp shared items...)
    Temp,
}

impl PathRole {
    /// Number of roles; the sentinel that terminates the enumeration.
    pub const COUNT: usize = 10;

    pub const ALL: [Self; Self::COUNT] = [
        Self::GlobalConfig,
        Self::UserConfig,
        Self::UserLocale,
        Self::Resources,
        Self::Locale,
        Self::Downloads,
        Self::FileLists,
        Self::Bundles,
        Self::ShareCache,
        Self::Temp,
    ];

    /// Position of the role in the path table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case key used in diagnostics output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GlobalConfig => "global_config",
            Self::UserConfig => "user_config",
            Self::UserLocale => "user_locale",
            Self::Resources => "resources",
            Self::Locale => "locale",
            Self::Downloads => "downloads",
            Self::FileLists => "file_lists",
            Self::Bundles => "bundles",
            Self::ShareCache => "share_cache",
            Self::Temp => "temp",
        }
    }

    /// Roles that belong to the installation rather than the user.
    ///
    /// These are never created at startup, only checked.
    pub const fn is_install_location(self) -> bool {
        matches!(self, Self::GlobalConfig | Self::Resources | Self::Locale)
    }
}

impl std::fmt::Display for PathRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        for (position, role) in PathRole::ALL.iter().enumerate() {
            assert_eq!(role.index(), position);
        }
        assert_eq!(PathRole::Temp.index() + 1, PathRole::COUNT);
    }

    #[test]
    fn install_locations() {
        let install: Vec<_> = PathRole::ALL
            .into_iter()
            .filter(|r| r.is_install_location())
            .collect();
        assert_eq!(
            install,
            vec![PathRole::GlobalConfig, PathRole::Resources, PathRole::Locale]
        );
    }
}
