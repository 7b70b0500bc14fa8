//! Staging profile selection.

use crate::model::StagingProfile;

/// Outcome of picking a staging profile.
///
/// Not finding exactly one candidate is an expected outcome, not an error:
/// the caller decides how to ask for more input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileResolution {
    Selected(String),
    NoProfiles,
    /// Several profiles exist and none was named; every candidate is listed.
    Ambiguous(Vec<StagingProfile>),
}

/// An explicit id always wins; otherwise a single available profile is picked.
///
/// The explicit id is not checked against `profiles`; the server rejects
/// unknown ids when the repository is created.
pub fn resolve_profile(explicit: Option<&str>, profiles: Vec<StagingProfile>) -> ProfileResolution {
    if let Some(id) = explicit.filter(|id| !id.is_empty()) {
        return ProfileResolution::Selected(id.to_string());
    }
    match profiles.len() {
        0 => ProfileResolution::NoProfiles,
        1 => {
            let profile = profiles.into_iter().next().map(|p| p.id).unwrap_or_default();
            ProfileResolution::Selected(profile)
        }
        _ => ProfileResolution::Ambiguous(profiles),
    }
}

/// One `- name: --profile-id=id` line per candidate.
pub fn describe_candidates(profiles: &[StagingProfile]) -> String {
    profiles
        .iter()
        .map(|p| format!("- {}: --profile-id={}", p.name, p.id))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str) -> StagingProfile {
        StagingProfile {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn explicit_id_skips_lookup() {
        assert_eq!(
            resolve_profile(Some("abc"), vec![]),
            ProfileResolution::Selected("abc".to_string())
        );
    }

    #[test]
    fn empty_explicit_id_is_ignored() {
        assert_eq!(resolve_profile(Some(""), vec![]), ProfileResolution::NoProfiles);
    }

    #[test]
    fn candidates_are_listed_one_per_line() {
        let text = describe_candidates(&[profile("1", "com.a"), profile("2", "com.b")]);
        assert_eq!(text, "- com.a: --profile-id=1\n- com.b: --profile-id=2");
    }
}
