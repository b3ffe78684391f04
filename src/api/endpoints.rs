//! Endpoint paths, relative to the session base URL.
//!
//! Every caller-provided segment is percent-encoded.

use urlencoding::encode;

use crate::models::Platform;

pub const PROJECTS: &str = "/projects";
pub const PROJECTS_FROM_URL: &str = "/projects/url";
pub const PROJECTS_FROM_REPOSITORY: &str = "/projects/repository";
pub const SIGNING_KEYS: &str = "/signkeys";
pub const TEMPLATES: &str = "/templates";
pub const VERSIONS: &str = "/versions";

pub fn project(id: &str) -> String {
    format!("{}/{}", PROJECTS, encode(id))
}

pub fn project_zip(id: &str) -> String {
    format!("{}/zip", project(id))
}

pub fn project_url(id: &str) -> String {
    format!("{}/url", project(id))
}

pub fn project_repository(id: &str) -> String {
    format!("{}/repository", project(id))
}

pub fn project_config(id: &str) -> String {
    format!("{}/config", project(id))
}

/// Default icon when `platform` is `None`.
pub fn project_icon(id: &str, platform: Option<Platform>) -> String {
    match platform {
        Some(platform) => format!("{}/icon/{}", project(id), platform),
        None => format!("{}/icon", project(id)),
    }
}

pub fn project_splash(id: &str, platform: Platform) -> String {
    format!("{}/splash/{}", project(id), platform)
}

pub fn project_compile(id: &str) -> String {
    format!("{}/compile", project(id))
}

pub fn project_compile_dev_app(id: &str) -> String {
    format!("{}/compile-devapp", project(id))
}

pub fn project_compilation(id: &str, platform: Platform) -> String {
    format!("{}/compilations/{}", project(id), platform)
}

pub fn project_key(id: &str, key_id: &str) -> String {
    format!("{}/keys/{}", project(id), encode(key_id))
}

pub fn project_platform_key(id: &str, platform: Platform) -> String {
    format!("{}/keys/{}", project(id), platform)
}

pub fn signing_key(id: &str) -> String {
    format!("{}/{}", SIGNING_KEYS, encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_paths() {
        assert_eq!(project("p1"), "/projects/p1");
        assert_eq!(project_config("p1"), "/projects/p1/config");
        assert_eq!(project_icon("p1", None), "/projects/p1/icon");
        assert_eq!(
            project_icon("p1", Some(Platform::Ios)),
            "/projects/p1/icon/ios"
        );
        assert_eq!(
            project_compilation("p1", Platform::Android),
            "/projects/p1/compilations/android"
        );
        assert_eq!(
            project_platform_key("p1", Platform::Windows),
            "/projects/p1/keys/windows"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        assert_eq!(project("a/b c"), "/projects/a%2Fb%20c");
        assert_eq!(signing_key("k?1"), "/signkeys/k%3F1");
        assert_eq!(project_key("p1", "k#2"), "/projects/p1/keys/k%232");
    }
}
