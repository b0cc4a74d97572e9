use indexmap::IndexMap;

use crate::error::{ErrorContext, PlannerError, PlannerResult};
use crate::models::{AllocationMode, TopicAllocation};

/// Distributes an hour budget across topics in proportion to importance.
///
/// Steps, in the importance map's insertion order:
///
/// 1. proportional split (`importance / Σ importance × budget`), or an equal
///    split when every topic scores zero
/// 2. topics under the floor are raised to it, but only when the budget is
///    strictly larger than the floor times the topic count
/// 3. all allocations are rescaled so they sum to the budget again
///
/// Allocations keep full precision so the sum stays equal to the budget.
#[derive(Debug, Clone)]
pub struct TimeAllocator {
    min_topic_hours: f64,
}

impl Default for TimeAllocator {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TimeAllocator {
    pub fn new(min_topic_hours: f64) -> Self {
        Self { min_topic_hours }
    }

    pub fn min_topic_hours(&self) -> f64 {
        self.min_topic_hours
    }

    /// Allocate `total_hours` across the topics of `topic_importance`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the budget is negative or not finite, or when a
    /// topic importance is negative or not finite.
    pub fn allocate(
        &self,
        topic_importance: &IndexMap<String, f64>,
        total_hours: f64,
    ) -> PlannerResult<TopicAllocation> {
        if !total_hours.is_finite() || total_hours < 0.0 {
            return Err(PlannerError::invalid_input(format!(
                "total hours must be a non-negative number, got {}",
                total_hours
            ))
            .with_stage("allocate"));
        }
        for (topic, &importance) in topic_importance {
            if !importance.is_finite() || importance < 0.0 {
                return Err(PlannerError::invalid_input(format!(
                    "topic importance must be a non-negative number, got {}",
                    importance
                ))
                .with_context(ErrorContext::new("allocate").with_topic(topic)));
            }
        }

        if topic_importance.is_empty() {
            return Ok(TopicAllocation::empty());
        }

        let topic_count = topic_importance.len();
        let sum_importance: f64 = topic_importance.values().sum();

        if sum_importance == 0.0 {
            log::warn!(
                "All {} topics have zero importance, splitting {} hours evenly",
                topic_count,
                total_hours
            );
            let share = total_hours / topic_count as f64;
            return Ok(TopicAllocation {
                hours: topic_importance
                    .keys()
                    .map(|topic| (topic.clone(), share))
                    .collect(),
                mode: AllocationMode::EqualWeightFallback,
            });
        }

        let mut hours: IndexMap<String, f64> = topic_importance
            .iter()
            .map(|(topic, &importance)| {
                (topic.clone(), importance / sum_importance * total_hours)
            })
            .collect();

        if total_hours > self.min_topic_hours * topic_count as f64 {
            for (topic, allocated) in hours.iter_mut() {
                if *allocated < self.min_topic_hours {
                    log::debug!(
                        "Raising '{}' from {:.3}h to the {}h floor",
                        topic,
                        allocated,
                        self.min_topic_hours
                    );
                    *allocated = self.min_topic_hours;
                }
            }
        }

        let current_total: f64 = hours.values().sum();
        if current_total > 0.0 {
            let scale = total_hours / current_total;
            for allocated in hours.values_mut() {
                *allocated *= scale;
            }
        }

        Ok(TopicAllocation {
            hours,
            mode: AllocationMode::Proportional,
        })
    }
}
