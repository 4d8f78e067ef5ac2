use std::cell::RefCell;

use fwstamp_core::vcs::{VcsError, VcsQuery, VcsResult};
use fwstamp_core::version::{
    diagnostic_line, resolve_version, BuildConstants, ConstantValue, BRANCH_CONSTANT,
    COMMIT_HASH_CONSTANT, IS_DIRTY_CONSTANT, VERSION_CONSTANT,
};

/// In-memory repository state; `fail_on` makes one query fail.
struct FakeVcs {
    repository: bool,
    branch: &'static str,
    hash: &'static str,
    dirty: bool,
    fail_on: Option<&'static str>,
    calls: RefCell<Vec<&'static str>>,
}

impl FakeVcs {
    fn new(branch: &'static str, hash: &'static str, dirty: bool) -> Self {
        Self { repository: true, branch, hash, dirty, fail_on: None, calls: RefCell::new(vec![]) }
    }

    fn answer<T>(&self, query: &'static str, value: T) -> VcsResult<T> {
        self.calls.borrow_mut().push(query);
        if self.fail_on == Some(query) {
            return Err(VcsError::QueryFailed { query: query.into(), reason: "boom".into() });
        }
        Ok(value)
    }
}

impl VcsQuery for FakeVcs {
    fn ensure_repository(&self) -> VcsResult<()> {
        self.calls.borrow_mut().push("status");
        if self.repository {
            Ok(())
        } else {
            Err(VcsError::RepositoryUnavailable("not a git repository".into()))
        }
    }

    fn branch(&self) -> VcsResult<String> {
        self.answer("branch", self.branch.to_string())
    }

    fn short_hash(&self) -> VcsResult<String> {
        self.answer("hash", self.hash.to_string())
    }

    fn is_dirty(&self) -> VcsResult<bool> {
        self.answer("dirty", self.dirty)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

#[test]
fn resolves_dirty_feature_branch() {
    let vcs = FakeVcs::new("feature/long-branch-name", "a1b2c3d4", true);
    let version = resolve_version(&vcs).expect("resolve");
    assert_eq!(version.branch, "feature/long-branch-name");
    assert_eq!(version.commit_hash, "a1b2c3d4");
    assert!(version.is_dirty);
    assert_eq!(version.version_string(), "feature/lo-a1b2c3d+");
}

#[test]
fn resolves_clean_main() {
    let vcs = FakeVcs::new("main", "deadbeefcafe", false);
    let version = resolve_version(&vcs).expect("resolve");
    assert_eq!(version.version_string(), "main-deadbee");
}

#[test]
fn repository_is_checked_before_any_query() {
    let vcs = FakeVcs { repository: false, ..FakeVcs::new("main", "abc1234", false) };
    let err = resolve_version(&vcs).unwrap_err();
    assert!(matches!(err, VcsError::RepositoryUnavailable(_)), "unexpected error: {err:?}");
    assert_eq!(*vcs.calls.borrow(), vec!["status"]);
}

#[test]
fn any_failed_query_aborts_without_fallback() {
    for query in ["branch", "hash", "dirty"] {
        let vcs = FakeVcs { fail_on: Some(query), ..FakeVcs::new("main", "abc1234", false) };
        let err = resolve_version(&vcs).unwrap_err();
        assert!(matches!(err, VcsError::QueryFailed { .. }), "{query}: {err:?}");
        assert_eq!(vcs.calls.borrow().last(), Some(&query));
    }
}

#[test]
fn resolving_twice_is_idempotent() {
    let vcs = FakeVcs::new("develop", "0badc0de", true);
    let first = resolve_version(&vcs).unwrap();
    let second = resolve_version(&vcs).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.version_string(), second.version_string());
}

#[test]
fn diagnostic_line_summarizes_state() {
    let vcs = FakeVcs::new("main", "deadbeefcafe", false);
    let version = resolve_version(&vcs).unwrap();
    assert_eq!(
        diagnostic_line(&version),
        "resolved version: main-deadbee (main, deadbeefcafe, clean)"
    );
}

#[test]
fn constants_carry_full_branch_and_hash() {
    let vcs = FakeVcs::new("feature/long-branch-name", "a1b2c3d4", true);
    let constants = BuildConstants::from_version(&resolve_version(&vcs).unwrap());

    let names: Vec<&str> = constants.entries.iter().map(|c| c.name).collect();
    assert_eq!(
        names,
        vec![VERSION_CONSTANT, BRANCH_CONSTANT, COMMIT_HASH_CONSTANT, IS_DIRTY_CONSTANT]
    );
    assert_eq!(
        constants.get(VERSION_CONSTANT),
        Some(&ConstantValue::Str("feature/lo-a1b2c3d+".into()))
    );
    assert_eq!(
        constants.get(BRANCH_CONSTANT),
        Some(&ConstantValue::Str("feature/long-branch-name".into()))
    );
    assert_eq!(constants.get(COMMIT_HASH_CONSTANT), Some(&ConstantValue::Str("a1b2c3d4".into())));
    assert_eq!(constants.get(IS_DIRTY_CONSTANT), Some(&ConstantValue::Flag(true)));
}
