//! Route classification: resource kind → (strategy, partition).

use stashway_core::{Partition, ResourceKind};

use crate::strategy::StrategyKind;

/// Derived routing decision for one request. Computed fresh per request,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDecision {
    pub strategy: StrategyKind,
    pub partition: Partition,
}

/// Map a resource kind to its strategy and cache partition.
///
/// Kinds outside the table are not intercepted at all: the boundary must
/// supply no response and let normal handling proceed.
pub fn classify(kind: ResourceKind) -> Option<RouteDecision> {
    match kind {
        ResourceKind::Document => Some(RouteDecision {
            strategy: StrategyKind::StaleWhileRevalidate,
            partition: Partition::Documents,
        }),
        ResourceKind::Worker | ResourceKind::Script => Some(RouteDecision {
            strategy: StrategyKind::NetworkFirst,
            partition: Partition::Scripts,
        }),
        ResourceKind::Image => Some(RouteDecision {
            strategy: StrategyKind::CacheFirst,
            partition: Partition::Images,
        }),
        ResourceKind::Style => Some(RouteDecision {
            strategy: StrategyKind::CacheFirst,
            partition: Partition::Styles,
        }),
        _ => None,
    }
}
