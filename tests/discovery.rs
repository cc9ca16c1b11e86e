use std::fs;
use std::path::Path;

use blobify::{ConfigError, DiscoverySnapshot, FileState, ScanError, Scanner};
use tempfile::TempDir;

fn init_repo(dir: &Path) {
    fs::create_dir(dir.join(".git")).unwrap();
}

fn relative_paths(snapshot: &DiscoverySnapshot) -> Vec<&str> {
    snapshot
        .files()
        .iter()
        .map(|file| file.relative_path.as_str())
        .collect()
}

fn state_of(snapshot: &DiscoverySnapshot, rel: &str) -> FileState {
    snapshot
        .files()
        .iter()
        .find(|file| file.relative_path == rel)
        .unwrap_or_else(|| panic!("{rel} not in snapshot"))
        .state
}

mod gitignore_rules {
    use super::*;

    #[test]
    fn test_gitignore_marks_files_vcs_ignored() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        fs::write(dir.path().join("a.py"), "x = 1").unwrap();
        fs::write(dir.path().join("b.log"), "line").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(relative_paths(&snapshot), vec!["a.py", "b.log"]);
        assert_eq!(state_of(&snapshot, "a.py"), FileState::Included);
        assert_eq!(state_of(&snapshot, "b.log"), FileState::VcsIgnored);
        assert!(!FileState::VcsIgnored.include_in_output());
        assert_eq!(snapshot.git_root(), Some(dir.path().canonicalize().unwrap().as_path()));
    }

    #[test]
    fn test_ignored_directory_pruned_and_listed() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".gitignore"), "logs/\n").unwrap();
        fs::create_dir(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join("logs/x.log"), "one").unwrap();
        fs::write(dir.path().join("logs/y.log"), "two").unwrap();
        fs::write(dir.path().join("main.py"), "pass").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(snapshot.skipped_dirs(), ["logs"]);
        assert_eq!(relative_paths(&snapshot), vec!["main.py"]);
    }

    #[test]
    fn test_negation_reincludes_file() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".gitignore"), "*.log\n!keep.log\n").unwrap();
        fs::write(dir.path().join("keep.log"), "kept").unwrap();
        fs::write(dir.path().join("drop.log"), "dropped").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "keep.log"), FileState::Included);
        assert_eq!(state_of(&snapshot, "drop.log"), FileState::VcsIgnored);
    }

    #[test]
    fn test_negation_cannot_resurrect_inside_ignored_dir() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".gitignore"), "logs/\n!logs/x.log\n").unwrap();
        fs::create_dir(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join("logs/x.log"), "one").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(snapshot.skipped_dirs(), ["logs"]);
        assert!(relative_paths(&snapshot).is_empty());
    }

    #[test]
    fn test_nested_gitignore_scopes_to_its_directory() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join("a.md"), "# a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/.gitignore"), "*.md\n").unwrap();
        fs::write(dir.path().join("sub/b.md"), "# b").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "a.md"), FileState::Included);
        assert_eq!(state_of(&snapshot, "sub/b.md"), FileState::VcsIgnored);
    }

    #[test]
    fn test_deeper_gitignore_overrides_parent() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".gitignore"), "*.md\n").unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/.gitignore"), "!guide.md\n").unwrap();
        fs::write(dir.path().join("docs/guide.md"), "# guide").unwrap();
        fs::write(dir.path().join("docs/other.md"), "# other").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "docs/guide.md"), FileState::Included);
        assert_eq!(state_of(&snapshot, "docs/other.md"), FileState::VcsIgnored);
    }
}

mod override_rules {
    use super::*;

    #[test]
    fn test_exclude_then_include_keeps_later_include() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".blobify"), "-**\n+*.py\n").unwrap();
        fs::write(dir.path().join("app.py"), "pass").unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "app.py"), FileState::OverrideIncluded);
        assert_eq!(state_of(&snapshot, "README.md"), FileState::OverrideExcluded);
    }

    #[test]
    fn test_include_then_exclude_keeps_later_exclude() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".blobify"), "+*.py\n-**\n").unwrap();
        fs::write(dir.path().join("app.py"), "pass").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "app.py"), FileState::OverrideExcluded);
    }

    #[test]
    fn test_exclude_all_then_include_tree_glob() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".blobify"), "-**\n+src/**/*.py\n").unwrap();
        fs::create_dir_all(dir.path().join("src/deep")).unwrap();
        fs::write(dir.path().join("src/app.py"), "pass").unwrap();
        fs::write(dir.path().join("src/deep/b.py"), "pass").unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "src/app.py"), FileState::OverrideIncluded);
        assert!(state_of(&snapshot, "src/app.py").include_in_output());
        assert_eq!(state_of(&snapshot, "src/deep/b.py"), FileState::OverrideIncluded);
        assert_eq!(state_of(&snapshot, "README.md"), FileState::OverrideExcluded);
    }

    #[test]
    fn test_override_reaches_into_gitignored_directory() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".gitignore"), "logs/\n").unwrap();
        fs::write(dir.path().join(".blobify"), "+logs/**/*.log\n").unwrap();
        fs::create_dir(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join("logs/x.log"), "line").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "logs/x.log"), FileState::OverrideIncluded);
        // The directory itself stays pruned in the listing.
        assert_eq!(snapshot.skipped_dirs(), ["logs"]);
    }

    #[test]
    fn test_exclude_keeps_vcs_ignored_label() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        fs::write(dir.path().join(".blobify"), "-**\n").unwrap();
        fs::write(dir.path().join("a.py"), "pass").unwrap();
        fs::write(dir.path().join("b.log"), "line").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "a.py"), FileState::OverrideExcluded);
        assert_eq!(state_of(&snapshot, "b.log"), FileState::VcsIgnored);
    }

    #[test]
    fn test_include_can_restate_vcs_ignored_file() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        fs::write(dir.path().join(".blobify"), "+*.log\n").unwrap();
        fs::write(dir.path().join("b.log"), "line").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "b.log"), FileState::OverrideIncluded);
        assert!(state_of(&snapshot, "b.log").include_in_output());
    }

    #[test]
    fn test_later_exclude_removes_file_admitted_this_sweep() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".gitignore"), "data/\n").unwrap();
        fs::write(dir.path().join(".blobify"), "+data/**/*.csv\n-data/secret.csv\n").unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/ok.csv"), "a,b").unwrap();
        fs::write(dir.path().join("data/secret.csv"), "x,y").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "data/ok.csv"), FileState::OverrideIncluded);
        assert!(!relative_paths(&snapshot).contains(&"data/secret.csv"));
    }

    #[test]
    fn test_builtin_dirs_resist_include_overrides() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".blobify"), "+**\n").unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/pkg.js"), "module").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target/gen.py"), "pass").unwrap();
        fs::write(dir.path().join("app.py"), "pass").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(relative_paths(&snapshot), vec!["app.py"]);
    }

    #[test]
    fn test_anchor_patterns_match_relative_to_git_root() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".blobify"), "-sub/*.md\n").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.md"), "# b").unwrap();
        fs::write(dir.path().join("sub/c.py"), "pass").unwrap();

        let snapshot = Scanner::new(&dir.path().join("sub")).unwrap().scan().unwrap();
        assert_eq!(state_of(&snapshot, "b.md"), FileState::OverrideExcluded);
        assert_eq!(state_of(&snapshot, "c.py"), FileState::Included);
    }
}

mod context_selection {
    use super::*;

    #[test]
    fn test_named_context_changes_rules() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".blobify"), "[code]\n-**\n+*.py\n").unwrap();
        fs::write(dir.path().join("a.py"), "pass").unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();

        let default = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(state_of(&default, "a.py"), FileState::Included);
        assert_eq!(state_of(&default, "README.md"), FileState::Included);

        let code = Scanner::new(dir.path())
            .unwrap()
            .with_context("code")
            .scan()
            .unwrap();
        assert_eq!(state_of(&code, "a.py"), FileState::OverrideIncluded);
        assert_eq!(state_of(&code, "README.md"), FileState::OverrideExcluded);
        assert_eq!(code.context().name(), "code");
    }

    #[test]
    fn test_inherited_rules_apply_before_own() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".blobify"),
            "[strict]\n-**\n[docs:strict]\n+*.md\n",
        )
        .unwrap();
        fs::write(dir.path().join("a.md"), "# a").unwrap();
        fs::write(dir.path().join("b.py"), "pass").unwrap();

        let snapshot = Scanner::new(dir.path())
            .unwrap()
            .with_context("docs")
            .scan()
            .unwrap();
        assert_eq!(state_of(&snapshot, "a.md"), FileState::OverrideIncluded);
        assert_eq!(state_of(&snapshot, "b.py"), FileState::OverrideExcluded);
    }

    #[test]
    fn test_unknown_context_scans_without_patterns() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".blobify"), "[code]\n-**\n").unwrap();
        fs::write(dir.path().join("a.py"), "pass").unwrap();

        let snapshot = Scanner::new(dir.path())
            .unwrap()
            .with_context("nope")
            .scan()
            .unwrap();
        assert_eq!(state_of(&snapshot, "a.py"), FileState::Included);
        assert_eq!(snapshot.context().name(), "nope");
    }

    #[test]
    fn test_missing_parent_fails_only_when_requested() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".blobify"),
            "+*.py\n[child:ghost]\n+*.md\n",
        )
        .unwrap();
        fs::write(dir.path().join("a.py"), "pass").unwrap();

        let default = Scanner::new(dir.path()).unwrap().scan();
        assert!(default.is_ok());

        let broken = Scanner::new(dir.path())
            .unwrap()
            .with_context("child")
            .scan();
        match broken {
            Err(ScanError::Config(ConfigError::ParentNotFound { missing, .. })) => {
                assert_eq!(missing, "ghost");
            }
            other => panic!("expected ParentNotFound, got {other:?}"),
        }
    }
}

mod ordering {
    use super::*;

    #[test]
    fn test_listing_sorted_case_insensitively() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Zebra.py"), "pass").unwrap();
        fs::write(dir.path().join("alpha.py"), "pass").unwrap();
        fs::write(dir.path().join("Beta.py"), "pass").unwrap();

        let snapshot = Scanner::new(dir.path()).unwrap().scan().unwrap();
        assert_eq!(
            relative_paths(&snapshot),
            vec!["alpha.py", "Beta.py", "Zebra.py"]
        );
    }

    #[test]
    fn test_repeated_scans_are_identical() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        fs::write(dir.path().join(".blobify"), "-docs/**\n").unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/guide.md"), "# guide").unwrap();
        fs::write(dir.path().join("app.log"), "line").unwrap();
        fs::write(dir.path().join("main.py"), "pass").unwrap();

        let scanner = Scanner::new(dir.path()).unwrap();
        let first = scanner.scan().unwrap();
        let second = scanner.scan().unwrap();

        let shape = |snapshot: &DiscoverySnapshot| {
            snapshot
                .files()
                .iter()
                .map(|f| (f.relative_path.clone(), f.state))
                .collect::<Vec<_>>()
        };
        assert_eq!(shape(&first), shape(&second));
        assert_eq!(first.skipped_dirs(), second.skipped_dirs());
    }
}
