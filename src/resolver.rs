//! Entry points that drive the version engine over one repository

use tracing::{debug, info};

use crate::analyzer::{
    assemble, current_branch_name, locate_default_branch, BranchContext, BranchWalker,
    CommitClassifier,
};
use crate::config::{BranchSettings, EnvOverrides, Settings};
use crate::domain::{sanitize_branch_name, short_branch_name, TagMap, Version};
use crate::error::{ResolutionPhase, Result, ResultExt};
use crate::git::Repository;

/// Build the tag map from every lightweight and annotated tag
pub fn collect_tags<R: Repository>(repo: &R) -> Result<TagMap> {
    let mut tags = TagMap::new();
    for tag in repo.tags()? {
        debug!(tag = %tag.name, commit = %tag.commit, kind = ?tag.kind, "found tag");
        tags.insert(tag.commit, tag.name, tag.kind);
    }
    Ok(tags)
}

/// Compute the version of the commit HEAD points at
///
/// The default branch is resolved to its own version first. When HEAD is
/// the default branch's commit that version is returned as is; otherwise the
/// current branch is walked back to the default branch's commit (or the
/// nearest tag) and assembled on top of it with a prerelease label.
pub fn current_version<R: Repository>(
    repo: &R,
    settings: &Settings,
    branch_settings: &BranchSettings,
    overrides: &EnvOverrides,
) -> Result<Version> {
    if let Some(tag) = overrides.tag() {
        let version =
            Version::parse_tag(tag, &settings.tag_prefix).phase(ResolutionPhase::Tags)?;
        info!(%tag, %version, "version taken from tag build");
        return Ok(version);
    }

    let tags = collect_tags(repo).phase(ResolutionPhase::Tags)?;
    let head = repo.head().phase(ResolutionPhase::BranchIdentity)?;

    let default_branch = locate_default_branch(repo, &branch_settings.default_branch)
        .phase(ResolutionPhase::DefaultBranch)?;

    let walker = BranchWalker::new(repo, CommitClassifier::new(&tags, settings));
    let default_version = walker
        .resolve(default_branch.target, &settings.initial_version)
        .phase(ResolutionPhase::DefaultWalk)?;
    info!(branch = %default_branch.name, version = %default_version, "default branch version");

    if head.target == default_branch.target {
        return Ok(default_version);
    }

    let branch_name = current_branch_name(
        repo,
        &head,
        overrides,
        branch_settings.trim_branch_prefix,
    )
    .phase(ResolutionPhase::BranchIdentity)?;
    debug!(branch = %branch_name, "current branch");

    let records = walker
        .walk(head.target, Some(default_branch.target))
        .phase(ResolutionPhase::BranchWalk)?;

    let context = BranchContext {
        name: &branch_name,
        head: head.target,
        forbid_behind_default_branch: branch_settings.forbid_behind_default_branch,
    };
    let version =
        assemble(&records, &default_version, &context).phase(ResolutionPhase::Assembly)?;
    info!(%version, "resolved version");
    Ok(version)
}

/// Prerelease label for the current branch
///
/// Returns an empty string when the current branch is the default branch.
pub fn prerelease_label<R: Repository>(
    repo: &R,
    branch_settings: &BranchSettings,
    overrides: &EnvOverrides,
) -> Result<String> {
    let head = repo.head().phase(ResolutionPhase::BranchIdentity)?;
    let label = current_branch_name(repo, &head, overrides, branch_settings.trim_branch_prefix)
        .phase(ResolutionPhase::BranchIdentity)?;

    let default_label = sanitize_branch_name(
        short_branch_name(&branch_settings.default_branch),
        branch_settings.trim_branch_prefix,
    );
    if label == default_label {
        return Ok(String::new());
    }
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TagKind;
    use crate::error::GitverError;
    use crate::git::MockRepository;

    /// master: tagged 1.0.0, then two minor commits. feature/x branches off
    /// the tagged commit with one patch commit.
    fn scenario() -> (MockRepository, git2::Oid) {
        let mut repo = MockRepository::new();
        let tagged = repo.add_commit("initial", &[]);
        let m1 = repo.add_commit("one +semver: minor", &[tagged]);
        let m2 = repo.add_commit("two +semver: minor", &[m1]);
        let f1 = repo.add_commit("fix +semver: patch", &[tagged]);
        repo.add_tag("v1.0.0", tagged, TagKind::Lightweight);
        repo.set_branch("master", m2);
        repo.set_branch("feature/x", f1);
        (repo, f1)
    }

    #[test]
    fn test_default_branch_version() {
        let (mut repo, _) = scenario();
        repo.checkout("master");

        let version = current_version(
            &repo,
            &Settings::default(),
            &BranchSettings::default(),
            &EnvOverrides::ignored(),
        )
        .unwrap();
        assert_eq!(version.to_string(), "1.2.0");
    }

    #[test]
    fn test_branch_off_tag() {
        let (mut repo, f1) = scenario();
        repo.checkout("feature/x");

        let version = current_version(
            &repo,
            &Settings::default(),
            &BranchSettings::default(),
            &EnvOverrides::ignored(),
        )
        .unwrap();
        let short = &f1.to_string()[..4];
        assert_eq!(version.to_string(), format!("1.0.1-feature-x-1-{}", short));
    }

    #[test]
    fn test_branch_behind_forbidden() {
        let (mut repo, _) = scenario();
        repo.checkout("feature/x");

        let branch_settings = BranchSettings {
            forbid_behind_default_branch: true,
            ..BranchSettings::default()
        };
        let err = current_version(
            &repo,
            &Settings::default(),
            &branch_settings,
            &EnvOverrides::ignored(),
        )
        .unwrap_err();
        assert!(matches!(err.root(), GitverError::BehindDefault { .. }));
        assert!(matches!(
            err,
            GitverError::Phase {
                phase: ResolutionPhase::Assembly,
                ..
            }
        ));
    }

    #[test]
    fn test_divergence_count() {
        let mut repo = MockRepository::new();
        let a = repo.add_commit("a +semver: minor", &[]);
        let b1 = repo.add_commit("b1", &[a]);
        let b2 = repo.add_commit("b2", &[b1]);
        let b3 = repo.add_commit("b3", &[b2]);
        repo.set_branch("master", a);
        repo.set_branch("work", b3);
        repo.checkout("work");

        let version = current_version(
            &repo,
            &Settings::default(),
            &BranchSettings::default(),
            &EnvOverrides::ignored(),
        )
        .unwrap();
        assert_eq!(version.numeric(), (0, 2, 0));
        assert_eq!(
            version.prerelease,
            Some(format!("work-3-{}", &b3.to_string()[..4]))
        );
    }

    #[test]
    fn test_bump_on_default_head_applies_to_branch() {
        let mut repo = MockRepository::new();
        let merge = repo.add_commit("merge +semver: minor", &[]);
        let wip = repo.add_commit("wip", &[merge]);
        repo.set_branch("master", merge);
        repo.set_branch("work", wip);

        repo.checkout("master");
        let default_version = current_version(
            &repo,
            &Settings::default(),
            &BranchSettings::default(),
            &EnvOverrides::ignored(),
        )
        .unwrap();
        assert_eq!(default_version, Version::new(0, 1, 0));

        repo.checkout("work");
        let version = current_version(
            &repo,
            &Settings::default(),
            &BranchSettings::default(),
            &EnvOverrides::ignored(),
        )
        .unwrap();
        assert_eq!(version.to_string(), "0.2.0-work-1-0202");
    }

    #[test]
    fn test_tag_build_short_circuits() {
        let repo = MockRepository::new();
        let overrides = EnvOverrides {
            tag: Some("v4.5.6".to_string()),
            ..Default::default()
        };
        let version = current_version(
            &repo,
            &Settings::default(),
            &BranchSettings::default(),
            &overrides,
        )
        .unwrap();
        assert_eq!(version, Version::new(4, 5, 6));
    }

    #[test]
    fn test_invalid_tag_build_reports_tags_phase() {
        let repo = MockRepository::new();
        let overrides = EnvOverrides {
            tag: Some("nightly".to_string()),
            ..Default::default()
        };
        let err = current_version(
            &repo,
            &Settings::default(),
            &BranchSettings::default(),
            &overrides,
        )
        .unwrap_err();
        assert!(matches!(err.root(), GitverError::Version(_)));
        assert!(matches!(
            err,
            GitverError::Phase {
                phase: ResolutionPhase::Tags,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_default_branch() {
        let mut repo = MockRepository::new();
        let a = repo.add_commit("a", &[]);
        repo.set_branch("develop", a);
        repo.checkout("develop");

        let err = current_version(
            &repo,
            &Settings::default(),
            &BranchSettings::default(),
            &EnvOverrides::ignored(),
        )
        .unwrap_err();
        assert!(matches!(err.root(), GitverError::DefaultBranch(_)));
    }

    #[test]
    fn test_label_on_default_branch_is_empty() {
        let (mut repo, _) = scenario();
        repo.checkout("master");
        let label =
            prerelease_label(&repo, &BranchSettings::default(), &EnvOverrides::ignored()).unwrap();
        assert_eq!(label, "");
    }

    #[test]
    fn test_label_on_feature_branch() {
        let (mut repo, _) = scenario();
        repo.checkout("feature/x");
        let branch_settings = BranchSettings {
            trim_branch_prefix: true,
            ..BranchSettings::default()
        };
        let label = prerelease_label(&repo, &branch_settings, &EnvOverrides::ignored()).unwrap();
        assert_eq!(label, "x");
    }
}
