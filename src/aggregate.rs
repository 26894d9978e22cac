//! Category aggregation.
//!
//! Each category is fetched and filtered on its own. Results are merged in
//! the caller's category order whether the fetches ran in parallel or not.
//! A point returned for two categories is kept twice, once per category.
//! A category listed twice is fetched once.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{GeometryError, SourceError};
use crate::models::{AcceptedPoint, BoundingBox, Category};
use crate::polyline::RoutePolyline;
use crate::proximity::{FilterOutcome, ProximityOptions, RouteCorridor, SkippedCandidate};
use crate::traits::PointSource;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOptions {
    pub proximity: ProximityOptions,
    /// Fetch categories concurrently on the rayon pool.
    pub parallel_fetch: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            proximity: ProximityOptions::default(),
            parallel_fetch: true,
        }
    }
}

/// Per-category counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: Category,
    pub fetched: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub outside_corridor: usize,
    pub beyond_distance: usize,
}

/// A category whose fetch failed; it contributed no points.
#[derive(Debug)]
pub struct CategoryFailure {
    pub category: Category,
    pub error: SourceError,
}

#[derive(Debug, Default)]
pub struct AggregateOutcome {
    /// Accepted points, category order then source order.
    pub points: Vec<AcceptedPoint>,
    /// One entry per successfully fetched category, in category order.
    pub summaries: Vec<CategorySummary>,
    pub skipped: Vec<SkippedCandidate>,
    pub failures: Vec<CategoryFailure>,
}

impl AggregateOutcome {
    /// True when some candidates or categories could not be processed.
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty() || !self.failures.is_empty()
    }

    pub fn points_in(&self, category: Category) -> impl Iterator<Item = &AcceptedPoint> {
        self.points.iter().filter(move |point| point.category == category)
    }
}

/// Fetches, filters and merges every category along `route`.
///
/// Only corridor construction can fail; fetch failures are reported in
/// [`AggregateOutcome::failures`].
pub fn aggregate<S>(
    route: &RoutePolyline,
    categories: &[Category],
    source: &S,
    options: &AggregateOptions,
) -> Result<AggregateOutcome, GeometryError>
where
    S: PointSource + Sync,
{
    let corridor = RouteCorridor::new(route, &options.proximity)?;
    let bbox = route.bounding_box().expand(options.proximity.radius_degrees());
    Ok(aggregate_with_corridor(&corridor, &bbox, categories, source, options.parallel_fetch))
}

/// Same as [`aggregate`] with a prepared corridor and query box.
pub fn aggregate_with_corridor<S>(
    corridor: &RouteCorridor,
    bbox: &BoundingBox,
    categories: &[Category],
    source: &S,
    parallel_fetch: bool,
) -> AggregateOutcome
where
    S: PointSource + Sync,
{
    let categories = Category::unique(categories);
    let runs: Vec<(Category, Result<(usize, FilterOutcome), SourceError>)> = if parallel_fetch {
        categories
            .par_iter()
            .map(|&category| (category, run_category(corridor, bbox, category, source)))
            .collect()
    } else {
        categories
            .iter()
            .map(|&category| (category, run_category(corridor, bbox, category, source)))
            .collect()
    };

    let mut outcome = AggregateOutcome::default();
    for (category, run) in runs {
        match run {
            Ok((fetched, filtered)) => {
                info!(
                    %category,
                    fetched,
                    accepted = filtered.accepted.len(),
                    skipped = filtered.skipped.len(),
                    "filtered category"
                );
                outcome.summaries.push(CategorySummary {
                    category,
                    fetched,
                    accepted: filtered.accepted.len(),
                    skipped: filtered.skipped.len(),
                    outside_corridor: filtered.outside_corridor,
                    beyond_distance: filtered.beyond_distance,
                });
                outcome
                    .points
                    .extend(filtered.accepted.into_iter().map(|point| AcceptedPoint { category, ..point }));
                outcome.skipped.extend(filtered.skipped);
            }
            Err(error) => {
                warn!(%category, %error, "category fetch failed");
                outcome.failures.push(CategoryFailure { category, error });
            }
        }
    }

    outcome
}

fn run_category<S: PointSource>(
    corridor: &RouteCorridor,
    bbox: &BoundingBox,
    category: Category,
    source: &S,
) -> Result<(usize, FilterOutcome), SourceError> {
    let candidates = source.query(bbox, category)?;
    Ok((candidates.len(), corridor.filter(&candidates)))
}
