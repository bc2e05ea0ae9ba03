//! # Planner Module Unit Tests / Planner 模块单元测试
//!
//! Classification, tree walking and sink layout.
//!
//! 文件分类、目录遍历和日志文件布局。

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use toolchain_matrix::config::TargetsConfig;
use toolchain_matrix::models::{Action, Grouping, Target, ToolchainInstance};
use toolchain_matrix::planner::{classify, plan_sinks, plan_targets, sink_path};

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "package main\n").unwrap();
}

fn toolchain(version: &str) -> ToolchainInstance {
    ToolchainInstance {
        version: version.to_string(),
        root: PathBuf::from(format!("/opt/go/go{}", version)),
        binary: PathBuf::from(format!("/opt/go/go{}/bin/go", version)),
        workspace: PathBuf::from(format!("/work/gopath/{}", version)),
        workspace_env: "GOPATH".to_string(),
        root_env: "GOROOT".to_string(),
    }
}

#[cfg(test)]
mod classify_tests {
    use super::*;

    #[test]
    fn test_test_suffix_wins_over_source_suffix() {
        let rules = TargetsConfig::default();
        assert_eq!(classify("a_test.go", &rules), Some(Action::Test));
        assert_eq!(classify("a.go", &rules), Some(Action::Run));
        assert_eq!(classify("README.md", &rules), None);
        assert_eq!(classify("go.mod", &rules), None);
    }

    #[test]
    fn test_excluded_names_are_ignored() {
        let rules = TargetsConfig {
            exclude: vec!["walktest.go".to_string(), "skip_test.go".to_string()],
            ..TargetsConfig::default()
        };
        assert_eq!(classify("walktest.go", &rules), None);
        assert_eq!(classify("skip_test.go", &rules), None);
        // Exclusion matches whole names only.
        assert_eq!(classify("my_walktest.go", &rules), Some(Action::Run));
    }

    #[test]
    fn test_custom_suffixes() {
        let rules = TargetsConfig {
            test_suffix: ".spec.ts".to_string(),
            source_suffix: ".ts".to_string(),
            exclude: vec![],
        };
        assert_eq!(classify("app.spec.ts", &rules), Some(Action::Test));
        assert_eq!(classify("app.ts", &rules), Some(Action::Run));
        assert_eq!(classify("app.go", &rules), None);
    }
}

#[cfg(test)]
mod walk_tests {
    use super::*;

    #[test]
    fn test_walk_is_depth_first_and_sorted() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "b_test.go");
        touch(root, "a.go");
        touch(root, "pkg/z.go");
        touch(root, "pkg/inner/c_test.go");
        touch(root, "a_test.go");
        touch(root, "notes.txt");

        let plan = plan_targets(root, &root.join("gopath"), &TargetsConfig::default()).unwrap();
        let found: Vec<(PathBuf, Action)> = plan
            .targets
            .iter()
            .map(|t| (t.path.strip_prefix(root).unwrap().to_path_buf(), t.action))
            .collect();

        assert_eq!(
            found,
            vec![
                (PathBuf::from("a.go"), Action::Run),
                (PathBuf::from("a_test.go"), Action::Test),
                (PathBuf::from("b_test.go"), Action::Test),
                (PathBuf::from("pkg/inner/c_test.go"), Action::Test),
                (PathBuf::from("pkg/z.go"), Action::Run),
            ]
        );
        assert_eq!(plan.count(Action::Run), 2);
        assert_eq!(plan.count(Action::Test), 3);
        assert!(!plan.workspace_pruned);
    }

    #[test]
    fn test_workspace_subtree_is_pruned() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "a.go");
        touch(root, "gopath/1.8.7/src/dep/dep.go");
        touch(root, "gopath/1.8.7/src/dep/dep_test.go");
        touch(root, "gopathological/x.go");

        let plan = plan_targets(root, &root.join("gopath"), &TargetsConfig::default()).unwrap();
        let names: Vec<String> = plan
            .targets
            .iter()
            .map(|t| t.file_name().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.go", "x.go"]);
        assert!(plan.workspace_pruned);
    }

    #[test]
    fn test_excluded_file_is_skipped_anywhere() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "walktest.go");
        touch(root, "sub/walktest.go");
        touch(root, "sub/b.go");

        let plan = plan_targets(root, &root.join("gopath"), &TargetsConfig::default()).unwrap();
        let names: Vec<String> = plan
            .targets
            .iter()
            .map(|t| t.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["b.go"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("missing");
        let result = plan_targets(&root, &root.join("gopath"), &TargetsConfig::default());
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to walk"), "{}", message);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "a.go");
        touch(root, "locked/b.go");
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Mode bits do not apply to a privileged user.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = plan_targets(root, &root.join("gopath"), &TargetsConfig::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to walk"), "{}", message);
    }

    #[test]
    fn test_empty_tree_has_no_targets() {
        let dir = tempdir().unwrap();
        let plan = plan_targets(
            dir.path(),
            &dir.path().join("gopath"),
            &TargetsConfig::default(),
        )
        .unwrap();
        assert!(plan.targets.is_empty());
    }
}

#[cfg(test)]
mod sink_layout_tests {
    use super::*;

    fn targets() -> Vec<Target> {
        vec![
            Target {
                path: PathBuf::from("/src/a.go"),
                action: Action::Run,
            },
            Target {
                path: PathBuf::from("/src/pkg/a_test.go"),
                action: Action::Test,
            },
        ]
    }

    #[test]
    fn test_per_file_layout() {
        let toolchains = vec![toolchain("1.8.7"), toolchain("1.9.7")];
        let groups = plan_sinks(Grouping::PerFile, &targets(), &toolchains, ".txt");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].file_name, "a.go.txt");
        assert_eq!(groups[1].file_name, "a_test.go.txt");
        let labels: Vec<&str> = groups[1].sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["1.8.7", "1.9.7"]);
        assert!(groups[1].sections.iter().all(|s| s.target == 1));
        assert_eq!(groups[1].sections[1].toolchain, 1);
    }

    #[test]
    fn test_per_version_layout() {
        let toolchains = vec![toolchain("1.8.7"), toolchain("1.9.7")];
        let groups = plan_sinks(Grouping::PerVersion, &targets(), &toolchains, ".log");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].file_name, "1.8.7.log");
        assert_eq!(groups[1].file_name, "1.9.7.log");
        let labels: Vec<&str> = groups[0].sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["/src/a.go", "/src/pkg/a_test.go"]);
        assert!(groups[1].sections.iter().all(|s| s.toolchain == 1));
    }

    #[test]
    fn test_no_versions_means_empty_sinks_per_file_and_none_per_version() {
        let per_file = plan_sinks(Grouping::PerFile, &targets(), &[], ".txt");
        assert_eq!(per_file.len(), 2);
        assert!(per_file.iter().all(|g| g.sections.is_empty()));

        assert!(plan_sinks(Grouping::PerVersion, &targets(), &[], ".txt").is_empty());
    }

    #[test]
    fn test_sink_path_joins_output_dir() {
        let groups = plan_sinks(Grouping::PerFile, &targets(), &[toolchain("1.11")], ".txt");
        assert_eq!(
            sink_path(Path::new("/out"), &groups[0]),
            PathBuf::from("/out/a.go.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_get_distinct_sinks() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let first = PathBuf::from("/src").join(OsStr::from_bytes(b"a\xff.go"));
        let second = PathBuf::from("/src").join(OsStr::from_bytes(b"a\xfe.go"));
        let targets = vec![
            Target {
                path: first,
                action: Action::Run,
            },
            Target {
                path: second,
                action: Action::Run,
            },
        ];
        let groups = plan_sinks(Grouping::PerFile, &targets, &[toolchain("1.11")], ".txt");

        assert_ne!(groups[0].file_name, groups[1].file_name);
        assert_eq!(groups[0].file_name.as_bytes(), b"a\xff.go.txt");
    }
}
