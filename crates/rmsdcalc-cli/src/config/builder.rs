use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::Cli;
use crate::error::{CliError, Result};
use rmsdcalc::core::io::extract::PdbExtractor;
use rmsdcalc::engine::config::{BatchConfigBuilder, FailurePolicy, SelectionConfig};
use tracing::debug;

pub fn build_config(cli: &Cli) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &cli.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &cli.set_values)?;
    debug!("Configuration after --set overrides: {:?}", file_config);

    let target_file = file_config.target.take().unwrap_or_default();
    let model_file = file_config.model.take().unwrap_or_default();

    let target_path = cli.target.clone().or(target_file.path).ok_or_else(|| {
        CliError::Argument(
            "No target structure given. Use -t/--target or set target.path in the config file."
                .to_string(),
        )
    })?;

    let output_path = cli
        .output
        .clone()
        .or(file_config.output)
        .unwrap_or(defaults.output);

    let failure_policy = if cli.skip_failed {
        FailurePolicy::Skip
    } else {
        match file_config.failure_policy.as_deref() {
            Some(policy) => policy.parse::<FailurePolicy>()?,
            None => defaults.failure_policy,
        }
    };

    let target_selection = SelectionConfig::parse(
        cli.target_selection
            .as_deref()
            .or(target_file.selection.as_deref())
            .unwrap_or(&defaults.selection),
        cli.target_ignore_selection
            .as_deref()
            .or(target_file.ignore_selection.as_deref())
            .unwrap_or(&defaults.ignore_selection),
    )?;
    let model_selection = SelectionConfig::parse(
        cli.model_selection
            .as_deref()
            .or(model_file.selection.as_deref())
            .unwrap_or(&defaults.selection),
        cli.model_ignore_selection
            .as_deref()
            .or(model_file.ignore_selection.as_deref())
            .unwrap_or(&defaults.ignore_selection),
    )?;

    let extractor = PdbExtractor::new()
        .include_hetero(
            cli.include_hetatm || file_config.include_hetatm.unwrap_or(defaults.include_hetatm),
        )
        .include_hydrogens(
            cli.include_hydrogens
                || file_config
                    .include_hydrogens
                    .unwrap_or(defaults.include_hydrogens),
        );

    let batch = BatchConfigBuilder::new()
        .target_path(target_path)
        .model_paths(cli.models.clone())
        .target_selection(target_selection)
        .model_selection(model_selection)
        .failure_policy(failure_policy)
        .superposed_dir(cli.superposed_dir.clone().or(file_config.superposed_dir))
        .build()?;

    Ok(AppConfig {
        output_path,
        batch,
        extractor,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let value = value.to_string();

        match key.trim() {
            "output" => config.output = Some(value.into()),
            "failure-policy" => {
                value.parse::<FailurePolicy>()?;
                config.failure_policy = Some(value);
            }
            "superposed-dir" => config.superposed_dir = Some(value.into()),
            "include-hetatm" => config.include_hetatm = Some(parse_bool(key, &value)?),
            "include-hydrogens" => config.include_hydrogens = Some(parse_bool(key, &value)?),
            "target.path" => {
                config.target.get_or_insert_with(Default::default).path = Some(value.into())
            }
            "target.selection" => {
                config.target.get_or_insert_with(Default::default).selection = Some(value)
            }
            "target.ignore-selection" => {
                config
                    .target
                    .get_or_insert_with(Default::default)
                    .ignore_selection = Some(value)
            }
            "model.selection" => {
                config.model.get_or_insert_with(Default::default).selection = Some(value)
            }
            "model.ignore-selection" => {
                config
                    .model
                    .get_or_insert_with(Default::default)
                    .ignore_selection = Some(value)
            }
            other => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    other
                )));
            }
        }
    }
    Ok(config)
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid value for '{}': '{}'. Expected true or false.",
            key.trim(),
            value
        ))
    })
}
