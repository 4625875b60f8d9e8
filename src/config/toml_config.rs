use crate::core::transforms::TransformSpec;
use crate::domain::schema::{FieldKind, FieldSpec, Schema};
use crate::utils::error::{Result, RunnerError};
use crate::utils::validation::{
    validate_field_name, validate_finite, validate_non_empty_string, validate_range_bounds,
    validate_unique_names, Validate,
};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Runner configuration loaded from TOML: the schema input must satisfy
/// and the steps applied to each record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    #[serde(default)]
    pub runner: RunnerInfo,
    pub schema: Schema,
    #[serde(default)]
    pub transform: TransformConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RunnerInfo {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    #[serde(default)]
    pub steps: Vec<TransformSpec>,
}

impl Default for RunnerConfig {
    /// Accepts records with a numeric `value` and doubles it.
    fn default() -> Self {
        Self {
            runner: RunnerInfo {
                name: Some("double-value".to_string()),
                description: Some("Doubles the numeric field 'value'".to_string()),
            },
            schema: Schema::new().field(FieldSpec::required("value", FieldKind::Number)),
            transform: TransformConfig {
                steps: vec![TransformSpec::Scale {
                    field: "value".to_string(),
                    factor: 2.0,
                }],
            },
        }
    }
}

impl RunnerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RunnerError::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| RunnerError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${FIELD_NAME})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| RunnerError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn name(&self) -> &str {
        self.runner.name.as_deref().unwrap_or("unnamed")
    }
}

fn validate_fields(scope: &str, fields: &[FieldSpec]) -> Result<()> {
    validate_unique_names(scope, fields.iter().map(|f| f.name.as_str()))?;

    for field in fields {
        validate_field_name(scope, &field.name)?;
        let path = format!("{}.{}", scope, field.name);

        if field.items.is_some() && field.kind != FieldKind::Sequence {
            return Err(RunnerError::invalid_config(
                &path,
                "'items' is only allowed on sequence fields",
            ));
        }

        // 巢狀欄位只適用於 record 或 record 組成的 sequence
        let element_kind = field.items.unwrap_or(field.kind);
        let holds_records = field.kind == FieldKind::Record
            || (field.kind == FieldKind::Sequence && field.items == Some(FieldKind::Record));
        if !field.fields.is_empty() && !holds_records {
            return Err(RunnerError::invalid_config(
                &path,
                "nested 'fields' require a record or a sequence of records",
            ));
        }

        if field.pattern.is_some() && element_kind != FieldKind::String {
            return Err(RunnerError::invalid_config(
                &path,
                "'pattern' requires string values",
            ));
        }

        if (field.min.is_some() || field.max.is_some()) && !element_kind.is_numeric() {
            return Err(RunnerError::invalid_config(
                &path,
                "'min'/'max' require numeric values",
            ));
        }
        validate_range_bounds(&path, field.min, field.max)?;

        validate_fields(&path, &field.fields)?;
    }

    Ok(())
}

fn validate_step(index: usize, step: &TransformSpec) -> Result<()> {
    let scope = format!("transform.steps[{}]", index);
    match step {
        TransformSpec::Identity => Ok(()),
        TransformSpec::Scale { field, factor } => {
            validate_non_empty_string(&format!("{}.field", scope), field)?;
            validate_finite(&format!("{}.factor", scope), *factor)
        }
        TransformSpec::Rename { from, to } => {
            validate_field_name(&format!("{}.from", scope), from)?;
            validate_field_name(&format!("{}.to", scope), to)?;
            if from == to {
                return Err(RunnerError::invalid_config(
                    &scope,
                    "'from' and 'to' must differ",
                ));
            }
            Ok(())
        }
        TransformSpec::Drop { fields } | TransformSpec::Keep { fields } => {
            if fields.is_empty() {
                return Err(RunnerError::invalid_config(
                    &format!("{}.fields", scope),
                    "at least one field is required",
                ));
            }
            fields
                .iter()
                .try_for_each(|f| validate_field_name(&format!("{}.fields", scope), f))
        }
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<()> {
        validate_fields("schema.fields", &self.schema.fields)?;

        for (index, step) in self.transform.steps.iter().enumerate() {
            validate_step(index, step)?;
        }

        Ok(())
    }
}
