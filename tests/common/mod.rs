#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

/// A throwaway repository whose commits all share an empty tree
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        TestRepo { dir, repo }
    }

    fn signature(&self) -> Signature<'static> {
        Signature::now("Test User", "test@example.com").expect("Could not create signature")
    }

    /// Commit on top of `branch`, creating the branch if needed
    pub fn commit_on(&self, branch: &str, message: &str) -> Oid {
        let reference = format!("refs/heads/{}", branch);
        let parent = self
            .repo
            .find_reference(&reference)
            .ok()
            .and_then(|r| r.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let tree_id = self
            .repo
            .treebuilder(None)
            .and_then(|builder| builder.write())
            .expect("Could not write tree");
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");
        let sig = self.signature();

        self.repo
            .commit(Some(&reference), &sig, &sig, message, &tree, &parents)
            .expect("Could not create commit")
    }

    /// Create `branch` pointing at `commit`
    pub fn branch_at(&self, branch: &str, commit: Oid) {
        let commit = self.repo.find_commit(commit).expect("Could not find commit");
        self.repo
            .branch(branch, &commit, true)
            .expect("Could not create branch");
    }

    pub fn checkout(&self, branch: &str) {
        self.repo
            .set_head(&format!("refs/heads/{}", branch))
            .expect("Could not set HEAD");
    }

    pub fn detach(&self, commit: Oid) {
        self.repo.set_head_detached(commit).expect("Could not detach HEAD");
    }

    pub fn lightweight_tag(&self, name: &str, commit: Oid) {
        let object = self.repo.find_object(commit, None).expect("Could not find object");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("Could not create tag");
    }

    pub fn annotated_tag(&self, name: &str, commit: Oid) {
        let object = self.repo.find_object(commit, None).expect("Could not find object");
        let sig = self.signature();
        self.repo
            .tag(name, &object, &sig, "release", false)
            .expect("Could not create tag");
    }

    pub fn short(commit: Oid) -> String {
        commit.to_string()[..4].to_string()
    }
}
