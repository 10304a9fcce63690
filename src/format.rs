//! Display formatting
//!
//! One rounding policy for every number a user sees: chart values, equation
//! text and summary statistics all go through [`DisplayFormat`].

use chrono::NaiveDate;

/// Number and date formatting shared by charts and explanations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFormat {
    precision: usize,
    date_format: String,
}

impl DisplayFormat {
    pub fn new(precision: usize, date_format: impl Into<String>) -> Self {
        Self {
            precision,
            date_format: date_format.into(),
        }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Round to the display precision; never yields negative zero
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.precision as i32);
        let rounded = (value * factor).round() / factor;
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }

    /// Fixed-precision text of a number
    pub fn number(&self, value: f64) -> String {
        format!("{:.*}", self.precision, self.round(value))
    }

    /// A 0-1 share as a percentage
    pub fn percent(&self, share: f64) -> String {
        format!("{}%", self.number(share * 100.0))
    }

    /// `a + b * x` with the sign folded into the operator
    pub fn linear_equation(&self, lhs: &str, intercept: f64, slope: f64, rhs: &str) -> String {
        let slope = self.round(slope);
        let op = if slope < 0.0 { '-' } else { '+' };
        format!(
            "{lhs} = {} {op} {} * ({rhs})",
            self.number(intercept),
            self.number(slope.abs())
        )
    }

    /// p-values below the display resolution are shown as an upper bound
    pub fn p_value(&self, p: f64) -> String {
        let resolution = 10f64.powi(-(self.precision as i32));
        if p < resolution {
            format!("<{}", self.number(resolution))
        } else {
            self.number(p)
        }
    }

    pub fn date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_DISPLAY_PRECISION,
            crate::config::DEFAULT_DATE_DISPLAY_FORMAT,
        )
    }
}

impl From<&crate::config::AnalyticsConfig> for DisplayFormat {
    fn from(config: &crate::config::AnalyticsConfig) -> Self {
        Self::new(config.display_precision, config.date_display_format.clone())
    }
}
