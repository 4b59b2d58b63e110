//! The explicit selection service object.
//!
//! Holds one immutable catalog snapshot and one configuration. Front ends
//! construct it once and pass it by reference; there is no global state.

use crate::cache::{CacheKey, EvaluationCache, Lookup};
use crate::error::{AppError, AppResult};
use crate::hash::{config_signature, duty_signature};
use ps_catalog::{Catalog, PumpRecord};
use ps_core::{EvalCounters, MetricsSnapshot};
use ps_engine::prefilter::screen;
use ps_engine::{
    DutyPoint, ExclusionRecord, PumpOutcome, SelectionConfig, SelectionReport, evaluate_pump,
    select_with,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
pub struct SelectionService {
    catalog: Arc<Catalog>,
    config: SelectionConfig,
    signature: String,
    cache: EvaluationCache,
    counters: EvalCounters,
}

impl SelectionService {
    /// Build a service. The configuration is validated here, once.
    pub fn new(catalog: impl Into<Arc<Catalog>>, config: SelectionConfig) -> AppResult<Self> {
        config.validate()?;
        let signature = config_signature(&config);
        Ok(Self {
            catalog: catalog.into(),
            config,
            signature,
            cache: EvaluationCache::default(),
            counters: EvalCounters::new(),
        })
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = EvaluationCache::new(ttl);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// SHA-256 of the configuration, part of every cache key.
    pub fn config_signature(&self) -> &str {
        &self.signature
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.counters.snapshot()
    }

    /// Rank the whole catalog against `duty`.
    pub fn select(&self, duty: &DutyPoint) -> AppResult<SelectionReport> {
        let duty_sig = duty_signature(duty);
        let report = select_with(duty, &self.catalog.pumps, &self.config, |pump| {
            self.evaluate_cached(pump, duty, &duty_sig)
        })?;
        Ok(report)
    }

    /// Explain a single pump: pre-filter screen, then full evaluation.
    pub fn evaluate_one(&self, code: &str, duty: &DutyPoint) -> AppResult<PumpOutcome> {
        duty.validate()?;
        let pump = self
            .catalog
            .pump(code)
            .ok_or_else(|| AppError::PumpNotFound(code.to_string()))?;

        if let Some((stage, reason)) = screen(pump, duty, &self.config.prefilter) {
            return Ok(PumpOutcome::Excluded(ExclusionRecord::new(
                pump.code.clone(),
                stage,
                reason,
            )));
        }
        Ok(self.evaluate_cached(pump, duty, &duty_signature(duty)))
    }

    fn evaluate_cached(&self, pump: &PumpRecord, duty: &DutyPoint, duty_sig: &str) -> PumpOutcome {
        let key = CacheKey::new(pump.code.as_str(), duty_sig, self.signature.as_str());
        let (outcome, lookup) = self.cache.get_or_compute(key, || {
            self.counters
                .instrument(|| evaluate_pump(pump, duty, &self.config))
        });
        if lookup == Lookup::Hit {
            self.counters.record_cache_hit();
        }
        outcome
    }
}
