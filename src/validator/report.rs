use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Check passed with a remark
    Warning(String),
    /// Check failed
    Failed(String),
}

impl CheckStatus {
    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warning(_) => "⚠",
            CheckStatus::Failed(_) => "✗",
        }
    }

    fn message(&self) -> Option<(&'static str, &str)> {
        match self {
            CheckStatus::Ok => None,
            CheckStatus::Warning(msg) => Some(("WARNING", msg)),
            CheckStatus::Failed(msg) => Some(("FAILED", msg)),
        }
    }
}

/// Named check with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationCheck {
    /// What was checked
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ValidationCheck {
    /// Passed check
    pub fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    /// Check passed with a remark
    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    /// Failed check
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// Ordered results of the checks run on one file
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Check results in the order they ran
    pub checks: Vec<ValidationCheck>,
    /// Path of the validated file
    pub file_path: String,
}

impl ValidationReport {
    /// Empty report for `file_path`
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            file_path: file_path.into(),
        }
    }

    /// Append a check result
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    fn count(&self, pred: impl Fn(&CheckStatus) -> bool) -> usize {
        self.checks.iter().filter(|c| pred(&c.status)).count()
    }

    /// Number of passed checks
    pub fn success_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Ok))
    }

    /// Number of checks passed with a remark
    pub fn warning_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Warning(_)))
    }

    /// Number of failed checks
    pub fn failure_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Failed(_)))
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Whether any check passed with a remark
    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// Whether the file can be used: no check failed
    pub fn is_valid(&self) -> bool {
        !self.has_failures()
    }

    fn verdict(&self) -> &'static str {
        if self.has_failures() {
            "Validation FAILED"
        } else if self.has_warnings() {
            "Validation PASSED with warnings"
        } else {
            "Validation PASSED"
        }
    }

    /// Report with terminal colors when the `colorized_output` feature is on
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            let mut out = String::new();
            out.push_str(&format!("{}\n", style("ORSO Validation Report").bold().cyan()));
            out.push_str(&format!("{}: {}\n\n", style("File").bold(), self.file_path));

            for check in &self.checks {
                let (symbol, name) = match &check.status {
                    CheckStatus::Ok => (Emoji("✓", "[OK]"), style(check.name.as_str()).green()),
                    CheckStatus::Warning(_) => {
                        (Emoji("⚠", "[WARN]"), style(check.name.as_str()).yellow())
                    }
                    CheckStatus::Failed(_) => {
                        (Emoji("✗", "[FAIL]"), style(check.name.as_str()).red())
                    }
                };
                out.push_str(&format!("[{}] {}", symbol, name));
                match &check.status {
                    CheckStatus::Ok => {}
                    CheckStatus::Warning(msg) => {
                        out.push_str(&format!(" - {}: {}", style("WARNING").yellow().bold(), msg))
                    }
                    CheckStatus::Failed(msg) => {
                        out.push_str(&format!(" - {}: {}", style("FAILED").red().bold(), msg))
                    }
                }
                out.push('\n');
            }

            out.push_str(&format!(
                "\n{}: {} passed, {} warnings, {} failed\n\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.failure_count()).red()
            ));
            let verdict = style(self.verdict()).bold();
            let verdict = if self.has_failures() {
                verdict.red()
            } else if self.has_warnings() {
                verdict.yellow()
            } else {
                verdict.green()
            };
            out.push_str(&format!("{}\n", verdict));
            out
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ORSO Validation Report")?;
        writeln!(f, "File: {}", self.file_path)?;
        writeln!(f)?;

        for check in &self.checks {
            write!(f, "[{}] {}", check.status.symbol(), check.name)?;
            match check.status.message() {
                Some((label, msg)) => writeln!(f, " - {}: {}", label, msg)?,
                None => writeln!(f)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.verdict())
    }
}
