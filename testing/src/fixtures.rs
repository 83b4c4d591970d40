use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use tempfile::TempDir;

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn unique_id(prefix: &str) -> String {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", prefix, id)
}

/// Branch every fixture repository starts on.
pub const DEFAULT_BRANCH: &str = "master";

/// Tags placed by [`TempRepo::tagged`], oldest first.
pub const FIXTURE_TAGS: [&str; 2] = ["0.0.1", "0.0.2"];

/// A throwaway git repository.
pub struct TempRepo {
    dir: TempDir,
    repo: Repository,
}

impl TempRepo {
    /// Empty repository with an unborn `master` branch.
    pub fn init() -> Self {
        Self::init_in(TempDir::new().expect("failed to create temp dir"))
    }

    /// Turn an existing temp directory into an empty repository.
    pub fn init_in(dir: TempDir) -> Self {
        let mut options = RepositoryInitOptions::new();
        options.initial_head(DEFAULT_BRANCH);
        let repo = Repository::init_opts(dir.path(), &options).expect("failed to init repository");
        tracing::debug!("Initialized fixture repository at {:?}", dir.path());
        Self { dir, repo }
    }

    /// Repository with a single commit and no tags.
    pub fn untagged() -> Self {
        let fixture = Self::init();
        fixture.commit_file("README.md", "# fixture\n");
        fixture
    }

    /// Repository whose HEAD carries tag `0.0.2`, with `0.0.1` one commit back.
    pub fn tagged() -> Self {
        let fixture = Self::untagged();
        fixture.tag(FIXTURE_TAGS[0]);
        fixture.commit_file("CHANGELOG.md", "## 0.0.2\n");
        fixture.tag(FIXTURE_TAGS[1]);
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        DEFAULT_BRANCH
    }

    /// Write `name` and commit it on top of HEAD.
    pub fn commit_file(&self, name: &str, contents: &str) -> Oid {
        fs::write(self.dir.path().join(name), contents).expect("failed to write file");

        let mut index = self.repo.index().expect("failed to open index");
        index.add_path(Path::new(name)).expect("failed to stage file");
        index.write().expect("failed to write index");
        let tree_id = index.write_tree().expect("failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("failed to find tree");

        let sig = Signature::now("Revision Tests", "tests@example.com")
            .expect("failed to create signature");
        let parent = self.repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents = parent.iter().collect::<Vec<_>>();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, &format!("Add {name}"), &tree, &parents)
            .expect("failed to commit")
    }

    /// Commit a uniquely named file.
    pub fn commit_change(&self) -> Oid {
        let name = format!("{}.txt", unique_id("change"));
        self.commit_file(&name, &name)
    }

    /// Lightweight tag on the HEAD commit.
    pub fn tag(&self, name: &str) {
        let head = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .expect("HEAD has no commit to tag");
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .expect("failed to create tag");
    }

    /// Point HEAD directly at its current commit.
    pub fn detach_head(&self) {
        let oid = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .expect("HEAD has no commit to detach at")
            .id();
        self.repo.set_head_detached(oid).expect("failed to detach HEAD");
    }

    pub fn head_commit(&self) -> String {
        self.repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .expect("HEAD has no commit")
            .id()
            .to_string()
    }
}

/// A throwaway application directory holding project files.
pub struct TempProject {
    dir: TempDir,
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TempProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn with_file(self, name: &str, contents: &str) -> Self {
        fs::write(self.dir.path().join(name), contents).expect("failed to write file");
        self
    }

    /// `pyproject.toml` declaring `[project].version`.
    #[must_use]
    pub fn with_pyproject(self, version: &str) -> Self {
        let contents = format!("[project]\nname = \"fixture\"\nversion = \"{version}\"\n");
        self.with_file("pyproject.toml", &contents)
    }

    /// `Cargo.toml` declaring `[package].version`.
    #[must_use]
    pub fn with_cargo_manifest(self, name: &str, version: &str) -> Self {
        let contents = format!("[package]\nname = \"{name}\"\nversion = \"{version}\"\n");
        self.with_file("Cargo.toml", &contents)
    }

    /// `VERSION` file; the trailing newline is added.
    #[must_use]
    pub fn with_version_file(self, version: &str) -> Self {
        let contents = format!("{version}\n");
        self.with_file("VERSION", &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_id() {
        assert_ne!(unique_id("a"), unique_id("a"));
    }

    #[test]
    fn test_tagged_repository_layout() {
        let fixture = TempRepo::tagged();
        let repo = fixture.repository();

        assert_eq!(repo.head().unwrap().shorthand(), Some(DEFAULT_BRANCH));
        assert!(repo.find_reference("refs/tags/0.0.1").is_ok());
        assert!(repo.find_reference("refs/tags/0.0.2").is_ok());
        assert_eq!(fixture.head_commit().len(), 40);
    }

    #[test]
    fn test_detach_head() {
        let fixture = TempRepo::untagged();
        let before = fixture.head_commit();
        fixture.detach_head();

        assert!(fixture.repository().head_detached().unwrap());
        assert_eq!(fixture.head_commit(), before);
    }

    #[test]
    fn test_project_files() {
        let project = TempProject::new()
            .with_pyproject("9.9.9")
            .with_version_file("8.8.8");

        assert!(project.path().join("pyproject.toml").is_file());
        assert_eq!(
            fs::read_to_string(project.path().join("VERSION")).unwrap(),
            "8.8.8\n"
        );
    }
}
