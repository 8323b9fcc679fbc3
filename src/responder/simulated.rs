//! Simulated assistant backend
//!
//! Stands in for a real model service: waits a random latency, then answers
//! with one of the locale's canned templates quoting the user's text.

use super::{ResponseError, ResponseGenerator};
use crate::config::ChatConfig;
use crate::locale::Locale;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

pub struct SimulatedResponder {
    templates: &'static [&'static str],
    delay_min: Duration,
    delay_max: Duration,
    failure_rate: f64,
}

impl SimulatedResponder {
    pub fn new(locale: Locale, delay_min: Duration, delay_max: Duration) -> Self {
        Self {
            templates: locale.response_templates(),
            delay_min,
            delay_max: delay_max.max(delay_min),
            failure_rate: 0.0,
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(
            config.locale,
            config.response_delay_min,
            config.response_delay_max,
        )
        .with_failure_rate(config.failure_rate)
    }

    /// Fail the given fraction of requests, clamped to `[0, 1]`
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        self
    }

    fn render(template: &str, user_text: &str) -> String {
        template.replace("{prompt}", user_text)
    }
}

#[async_trait]
impl ResponseGenerator for SimulatedResponder {
    async fn generate(&self, user_text: &str) -> Result<String, ResponseError> {
        // ThreadRng is not Send; draw everything before the first await
        let (delay, fail, template) = {
            let mut rng = rand::thread_rng();
            let delay = rng.gen_range(self.delay_min..=self.delay_max);
            let fail = rng.gen_bool(self.failure_rate);
            let template = self.templates.choose(&mut rng).copied();
            (delay, fail, template)
        };

        tokio::time::sleep(delay).await;

        if fail {
            return Err(ResponseError::network("Simulated backend failure"));
        }

        template
            .map(|t| Self::render(t, user_text))
            .ok_or_else(|| ResponseError::malformed("No response templates configured"))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
