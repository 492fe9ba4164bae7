use crate::domain::TagKind;
use crate::error::{GitverError, Result};
use crate::git::{CommitInfo, ReferenceInfo, Repository, TagInfo};
use git2::Oid;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
enum RefTarget {
    Direct(Oid),
    Symbolic(String),
}

/// In-memory repository with a scripted commit graph
///
/// Commit ids are derived from a counter, so the n-th commit added has an
/// id made of the byte `n` repeated (`0101…` for the first one).
pub struct MockRepository {
    commits: HashMap<Oid, CommitInfo>,
    tags: Vec<TagInfo>,
    references: BTreeMap<String, RefTarget>,
    head: RefTarget,
    remotes: HashMap<String, Vec<String>>,
    next_id: u16,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            tags: Vec::new(),
            references: BTreeMap::new(),
            head: RefTarget::Symbolic("refs/heads/master".to_string()),
            remotes: HashMap::new(),
            next_id: 1,
        }
    }

    /// Add a commit with the given parents and return its id
    pub fn add_commit(&mut self, message: impl Into<String>, parents: &[Oid]) -> Oid {
        let byte =
            u8::try_from(self.next_id).expect("MockRepository supports at most 255 commits");
        self.next_id += 1;
        let id = Oid::from_bytes(&[byte; 20]).expect("20 bytes form a valid oid");
        self.commits.insert(
            id,
            CommitInfo {
                id,
                message: message.into(),
                parents: parents.to_vec(),
            },
        );
        id
    }

    /// Add a tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, commit: Oid, kind: TagKind) {
        self.tags.push(TagInfo {
            name: name.into(),
            commit,
            kind,
        });
    }

    /// Point `refs/heads/<branch>` at a commit
    pub fn set_branch(&mut self, branch: &str, commit: Oid) {
        self.set_reference(&format!("refs/heads/{}", branch), commit);
    }

    pub fn set_reference(&mut self, name: &str, commit: Oid) {
        self.references
            .insert(name.to_string(), RefTarget::Direct(commit));
    }

    pub fn set_symbolic_reference(&mut self, name: &str, target: &str) {
        self.references
            .insert(name.to_string(), RefTarget::Symbolic(target.to_string()));
    }

    /// Attach HEAD to `refs/heads/<branch>`
    pub fn checkout(&mut self, branch: &str) {
        self.head = RefTarget::Symbolic(format!("refs/heads/{}", branch));
    }

    /// Detach HEAD at a commit
    pub fn detach_head(&mut self, commit: Oid) {
        self.head = RefTarget::Direct(commit);
    }

    pub fn add_remote(&mut self, name: &str, fetch_refspecs: &[&str]) {
        self.remotes.insert(
            name.to_string(),
            fetch_refspecs.iter().map(|s| s.to_string()).collect(),
        );
    }

    fn follow(&self, name: &str, depth: usize) -> Result<ReferenceInfo> {
        if depth > 8 {
            return Err(GitverError::branch(format!("reference loop at '{}'", name)));
        }
        match self.references.get(name) {
            Some(RefTarget::Direct(target)) => Ok(ReferenceInfo {
                name: name.to_string(),
                target: *target,
            }),
            Some(RefTarget::Symbolic(next)) => self.follow(next, depth + 1),
            None => Err(GitverError::Git(git2::Error::from_str(&format!(
                "reference '{}' not found",
                name
            )))),
        }
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn tags(&self) -> Result<Vec<TagInfo>> {
        Ok(self.tags.clone())
    }

    fn resolve_reference(&self, name: &str) -> Result<ReferenceInfo> {
        self.follow(name, 0)
    }

    fn commit(&self, id: Oid) -> Result<CommitInfo> {
        self.commits.get(&id).cloned().ok_or_else(|| {
            GitverError::Git(git2::Error::from_str(&format!("commit {} not found", id)))
        })
    }

    fn references(&self) -> Result<Vec<ReferenceInfo>> {
        Ok(self
            .references
            .iter()
            .filter_map(|(name, target)| match target {
                RefTarget::Direct(oid) => Some(ReferenceInfo {
                    name: name.clone(),
                    target: *oid,
                }),
                RefTarget::Symbolic(_) => None,
            })
            .collect())
    }

    fn head(&self) -> Result<ReferenceInfo> {
        match &self.head {
            RefTarget::Direct(oid) => Ok(ReferenceInfo {
                name: "HEAD".to_string(),
                target: *oid,
            }),
            RefTarget::Symbolic(name) => self.follow(name, 0),
        }
    }

    fn remote_fetch_refspecs(&self, remote: &str) -> Result<Option<Vec<String>>> {
        Ok(self.remotes.get(remote).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_commits() {
        let mut repo = MockRepository::new();
        let first = repo.add_commit("first commit", &[]);
        let second = repo.add_commit("second commit", &[first]);

        assert_ne!(first, second);
        assert_eq!(first.to_string(), "01".repeat(20));
        let info = repo.commit(second).unwrap();
        assert_eq!(info.message, "second commit");
        assert_eq!(info.parents, vec![first]);
    }

    #[test]
    fn test_mock_repository_head_follows_branch() {
        let mut repo = MockRepository::new();
        let first = repo.add_commit("first", &[]);
        repo.set_branch("develop", first);
        repo.checkout("develop");

        let head = repo.head().unwrap();
        assert_eq!(head.name, "refs/heads/develop");
        assert_eq!(head.target, first);
    }

    #[test]
    fn test_mock_repository_detached_head() {
        let mut repo = MockRepository::new();
        let first = repo.add_commit("first", &[]);
        repo.detach_head(first);
        assert_eq!(repo.head().unwrap().name, "HEAD");
    }

    #[test]
    fn test_mock_repository_symbolic_reference() {
        let mut repo = MockRepository::new();
        let first = repo.add_commit("first", &[]);
        repo.set_reference("refs/remotes/origin/main", first);
        repo.set_symbolic_reference("refs/remotes/origin/HEAD", "refs/remotes/origin/main");

        let resolved = repo.resolve_reference("refs/remotes/origin/HEAD").unwrap();
        assert_eq!(resolved.name, "refs/remotes/origin/main");
        assert_eq!(resolved.target, first);
        assert_eq!(repo.references().unwrap().len(), 1);
    }

    #[test]
    fn test_mock_repository_missing_things() {
        let repo = MockRepository::default();
        assert!(repo.resolve_reference("refs/heads/master").is_err());
        assert!(repo.head().is_err());
        assert_eq!(repo.remote_fetch_refspecs("origin").unwrap(), None);
        assert!(repo.tags().unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "at most 255 commits")]
    fn test_commit_ids_are_never_reused() {
        let mut repo = MockRepository::new();
        let mut parent = repo.add_commit("root", &[]);
        for _ in 0..255 {
            parent = repo.add_commit("next", &[parent]);
        }
    }
}
