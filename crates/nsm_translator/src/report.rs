//! Rendering of translated firewall policies.

use crate::error::{Error, Result};
use crate::firewall::{FirewallPolicy, FirewallRule};
use serde::Serialize;
use std::str::FromStr;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format for rendered policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One table per policy (default).
    #[default]
    Table,
    /// Pretty-printed JSON array.
    Json,
    /// YAML sequence.
    Yaml,
    /// One CSV row per rule.
    Csv,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "csv" => Ok(Self::Csv),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Renders firewall policies in a fixed format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    format: OutputFormat,
}

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Order")]
    order: usize,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    namespace: &'a str,
    name: &'a str,
    order: usize,
    direction: String,
    action: String,
    from: String,
    to: String,
}

impl From<&FirewallRule> for TableRow {
    fn from(rule: &FirewallRule) -> Self {
        Self {
            order: rule.order,
            direction: rule.direction.to_string(),
            action: rule.action.to_string(),
            from: rule.from.to_string(),
            to: rule.to.to_string(),
        }
    }
}

impl Reporter {
    /// Creates a reporter for the given format.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Renders the policies, preserving their order and rule order.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self, policies: &[FirewallPolicy]) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(render_table(policies)),
            OutputFormat::Json => serde_json::to_string_pretty(policies).map_err(Error::from),
            OutputFormat::Yaml => serde_yaml::to_string(policies).map_err(Error::from),
            OutputFormat::Csv => render_csv(policies),
        }
    }
}

fn render_table(policies: &[FirewallPolicy]) -> String {
    let mut output = String::new();

    for (i, policy) in policies.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("{}/{}\n", policy.namespace, policy.name));

        if policy.rules.is_empty() {
            output.push_str("(no rules)\n");
            continue;
        }

        let rows: Vec<TableRow> = policy.rules.iter().map(TableRow::from).collect();
        output.push_str(&Table::new(rows).with(Style::modern()).to_string());
        output.push('\n');
    }

    output
}

fn render_csv(policies: &[FirewallPolicy]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for policy in policies {
        for rule in &policy.rules {
            writer.serialize(CsvRow {
                namespace: &policy.namespace,
                name: &policy.name,
                order: rule.order,
                direction: rule.direction.to_string(),
                action: rule.action.to_string(),
                from: rule.from.to_string(),
                to: rule.to.to_string(),
            })?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Serialization(e.to_string()))
}
