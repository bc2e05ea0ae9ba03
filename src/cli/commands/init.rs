//! # Matrix Initialization Module / 矩阵初始化模块
//!
//! Creates a `ToolchainMatrix.toml`, either from the built-in defaults or
//! through a short interactive wizard asking for the versions, packages,
//! toolchain location and output grouping.
//!
//! 创建 `ToolchainMatrix.toml`：使用内置默认值，或通过一个简短的交互式向导
//! 询问版本、依赖包、工具链位置和输出分组方式。

use anyhow::{Context, Result, bail};
use colored::*;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::fs;
use std::path::Path;

use crate::core::config::{DEFAULT_CONFIG_FILE, MatrixConfig};
use crate::core::models::Grouping;
use crate::infra::t;

/// Runs the wizard (or its non-interactive shortcut) and writes the config
/// into the current directory.
///
/// An existing file is only replaced after confirmation (interactive) or
/// with `force` (non-interactive).
///
/// 运行向导（或其非交互式快捷方式）并将配置写入当前目录。
/// 已存在的文件只有在确认后（交互式）或指定 `force`（非交互式）时才会被替换。
pub fn run_init_wizard(language: &str, non_interactive: bool, force: bool) -> Result<()> {
    let config_path = Path::new(DEFAULT_CONFIG_FILE);

    if non_interactive {
        if config_path.exists() && !force {
            bail!(t!(
                "init_exists_use_force",
                locale = language,
                path = config_path.display()
            )
            .to_string());
        }
        let matrix = MatrixConfig {
            language: language.to_string(),
            ..MatrixConfig::default()
        };
        return write_config(config_path, &matrix, language);
    }

    let theme = ColorfulTheme::default();
    println!("\n{}", t!("init_wizard_welcome", locale = language).cyan().bold());
    println!("{}", t!("init_wizard_description", locale = language));

    if config_path.exists() && !force {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!(
                "init_overwrite_prompt",
                locale = language,
                path = config_path.display()
            ))
            .default(false)
            .interact()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init_aborted", locale = language));
            return Ok(());
        }
    }

    let defaults = MatrixConfig::default();

    let versions: String = Input::with_theme(&theme)
        .with_prompt(t!("init_versions_prompt", locale = language))
        .default(defaults.versions.join(", "))
        .interact_text()?;
    let packages: String = Input::with_theme(&theme)
        .with_prompt(t!("init_packages_prompt", locale = language))
        .default(defaults.packages.join(", "))
        .allow_empty(true)
        .interact_text()?;
    let root: String = Input::with_theme(&theme)
        .with_prompt(t!("init_root_prompt", locale = language))
        .default(defaults.toolchain.root.clone())
        .interact_text()?;
    let binary: String = Input::with_theme(&theme)
        .with_prompt(t!("init_binary_prompt", locale = language))
        .default(defaults.toolchain.binary.clone())
        .interact_text()?;

    let groupings = [Grouping::PerFile, Grouping::PerVersion];
    let grouping_labels = [
        t!("init_grouping_per_file", locale = language).to_string(),
        t!("init_grouping_per_version", locale = language).to_string(),
    ];
    let grouping_idx = Select::with_theme(&theme)
        .with_prompt(t!("init_grouping_prompt", locale = language))
        .items(&grouping_labels)
        .default(0)
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;

    let mut matrix = MatrixConfig {
        language: language.to_string(),
        versions: split_list(&versions),
        packages: split_list(&packages),
        grouping: groupings[grouping_idx],
        ..defaults
    };
    matrix.toolchain.root = root;
    matrix.toolchain.binary = binary;

    if matrix.versions.is_empty() {
        println!("{}", t!("init_no_versions", locale = language).yellow());
    }

    write_config(config_path, &matrix, language)
}

/// Splits a comma- or whitespace-separated answer into trimmed, non-empty items.
/// 将以逗号或空白分隔的输入拆分为去除空白的非空条目。
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn write_config(path: &Path, matrix: &MatrixConfig, language: &str) -> Result<()> {
    matrix.validate()?;
    let toml_string = toml::to_string_pretty(matrix)
        .context(t!("init_serialize_failed", locale = language).to_string())?;

    fs::write(path, toml_string).with_context(|| {
        t!("init_write_failed", locale = language, path = path.display()).to_string()
    })?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init_success_created", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init_usage_hint", locale = language));

    Ok(())
}
