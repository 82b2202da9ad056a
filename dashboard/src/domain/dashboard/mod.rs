//! Dashboard controller: load state, derivation pipeline, and user intents.
//!
//! Derivation is a pure pipeline over the loaded list: status overrides are
//! layered on, summary stats are computed over the full overlaid list,
//! filters narrow the displayed rows, and pagination slices the result. The
//! controller holds only the inputs (load state, filters, page, page size);
//! every [`DashboardView`] is derived fresh, with overrides re-read from
//! storage each time. The version counter exists purely as an invalidation
//! signal for caching renderers.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use pagination::{PageMeta, paginate};
use serde::Serialize;
use tracing::{error, info};

use crate::domain::error::Error;
use crate::domain::filters::UserFilters;
use crate::domain::overrides::StatusOverrideStore;
use crate::domain::ports::UserSource;
use crate::domain::user::{User, UserStatus};

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Summary metrics over the full (unfiltered) override-applied list.
///
/// Filters narrow only the displayed table; these counters always describe
/// the whole data set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Total number of users.
    pub total_users: usize,
    /// Users whose (override-applied) status is Active.
    pub active_users: usize,
    /// Users with a non-zero loan repayment.
    pub users_with_loans: usize,
    /// Users with a positive account balance.
    pub users_with_savings: usize,
}

/// Derived page of data consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    /// Rows for the current page, overrides applied.
    pub users: Vec<User>,
    /// Summary metrics over the unfiltered list.
    pub stats: DashboardStats,
    /// Pagination metadata for the filtered list.
    pub meta: PageMeta,
}

/// What the page should render right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DashboardView {
    /// The initial fetch is still in flight.
    Loading,
    /// The fetch failed; render the error panel.
    Failed {
        /// The surfaced fetch error.
        error: Error,
    },
    /// Data is present; render the table.
    Ready {
        /// The derived view model.
        model: ViewModel,
    },
}

/// Load progress of the user list.
///
/// A tagged union rather than independent loading/error flags, so an
/// impossible combination (loading and errored at once) cannot be
/// represented.
#[derive(Debug, Clone, PartialEq)]
enum LoadState {
    Loading,
    Loaded(Vec<User>),
    Failed(Error),
}

/// Clone the list with stored status overrides applied.
#[must_use]
pub fn apply_overrides(users: &[User], overrides: &HashMap<String, UserStatus>) -> Vec<User> {
    users
        .iter()
        .map(|user| {
            overrides.get(&user.id).map_or_else(
                || user.clone(),
                |status| User {
                    status: *status,
                    ..user.clone()
                },
            )
        })
        .collect()
}

fn compute_stats(users: &[User]) -> DashboardStats {
    DashboardStats {
        total_users: users.len(),
        active_users: users
            .iter()
            .filter(|user| user.status == UserStatus::Active)
            .count(),
        users_with_loans: users
            .iter()
            .filter(|user| user.education_and_employment.loan_repayment != "0")
            .count(),
        users_with_savings: users
            .iter()
            .filter(|user| {
                user.account_balance
                    .parse::<f64>()
                    .is_ok_and(|balance| balance > 0.0)
            })
            .count(),
    }
}

/// Pure derivation pipeline: overrides, stats, filters, then pagination.
///
/// Callable from any front end without the [`Dashboard`] controller.
#[must_use]
pub fn derive_view_model(
    users: &[User],
    overrides: &HashMap<String, UserStatus>,
    filters: &UserFilters,
    page: usize,
    page_size: NonZeroUsize,
) -> ViewModel {
    let overlaid = apply_overrides(users, overrides);
    let stats = compute_stats(&overlaid);

    let filtered: Vec<User> = if filters.is_empty() {
        overlaid
    } else {
        overlaid
            .into_iter()
            .filter(|user| filters.matches(user))
            .collect()
    };

    let page = paginate(&filtered, page, page_size);
    ViewModel {
        users: page.items,
        stats,
        meta: page.meta,
    }
}

/// Reactive coordinator composing fetch results, overrides, filters, and
/// pagination into the view model.
pub struct Dashboard {
    source: Arc<dyn UserSource>,
    overrides: StatusOverrideStore,
    state: LoadState,
    filters: UserFilters,
    page: usize,
    page_size: NonZeroUsize,
    filter_panel_open: bool,
    overrides_version: u64,
}

impl Dashboard {
    /// Build a dashboard over a user source and an override store.
    ///
    /// The dashboard starts in the loading state; call [`Dashboard::load`]
    /// to populate it.
    #[must_use]
    pub fn new(source: Arc<dyn UserSource>, overrides: StatusOverrideStore) -> Self {
        Self {
            source,
            overrides,
            state: LoadState::Loading,
            filters: UserFilters::default(),
            page: 1,
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
            filter_panel_open: false,
            overrides_version: 0,
        }
    }

    /// Fetch the user list, replacing the current load state.
    ///
    /// There is no cancellation: when loads overlap, whichever resolves last
    /// determines the state. Acceptable for a read-mostly tool.
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        match self.source.fetch_users().await {
            Ok(users) => {
                info!(count = users.len(), "user list loaded");
                self.state = LoadState::Loaded(users);
            }
            Err(err) => {
                error!(error = %err, "user list fetch failed");
                self.state = LoadState::Failed(err.into());
            }
        }
    }

    /// Derive what the page should render right now.
    ///
    /// Overrides are read fresh from storage on every call; nothing derived
    /// is cached on the controller.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        match &self.state {
            LoadState::Loading => DashboardView::Loading,
            LoadState::Failed(error) => DashboardView::Failed {
                error: error.clone(),
            },
            LoadState::Loaded(users) => DashboardView::Ready {
                model: derive_view_model(
                    users,
                    &self.overrides.overrides(),
                    &self.filters,
                    self.page,
                    self.page_size,
                ),
            },
        }
    }

    /// Replace the active filters, reset to page 1, close the filter panel.
    pub fn submit_filters(&mut self, filters: UserFilters) {
        self.filters = filters;
        self.page = 1;
        self.filter_panel_open = false;
    }

    /// Clear all filters, reset to page 1, close the filter panel.
    pub fn reset_filters(&mut self) {
        self.submit_filters(UserFilters::default());
    }

    /// Jump to a 1-based page; pages below 1 clamp to the first page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Change the page size, resetting to page 1 so a shrunken page count
    /// cannot leave the current page out of range.
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// Toggle the filter panel.
    pub fn toggle_filter_panel(&mut self) {
        self.filter_panel_open = !self.filter_panel_open;
    }

    /// Close the filter panel.
    pub fn close_filter_panel(&mut self) {
        self.filter_panel_open = false;
    }

    /// Whether the filter panel is open.
    #[must_use]
    pub fn filter_panel_open(&self) -> bool {
        self.filter_panel_open
    }

    /// Persist a status override for `user_id` and bump the version counter.
    ///
    /// # Errors
    /// Returns [`Error`] when the override store rejects the write; the
    /// version counter is not bumped in that case.
    pub fn set_status(&mut self, user_id: &str, status: UserStatus) -> Result<(), Error> {
        self.overrides.set_status(user_id, status)?;
        self.overrides_version = self.overrides_version.wrapping_add(1);
        Ok(())
    }

    /// Blacklist `user_id`.
    ///
    /// # Errors
    /// See [`Dashboard::set_status`].
    pub fn blacklist_user(&mut self, user_id: &str) -> Result<(), Error> {
        self.set_status(user_id, UserStatus::Blacklisted)
    }

    /// Activate `user_id`.
    ///
    /// # Errors
    /// See [`Dashboard::set_status`].
    pub fn activate_user(&mut self, user_id: &str) -> Result<(), Error> {
        self.set_status(user_id, UserStatus::Active)
    }

    /// Active filter criteria.
    #[must_use]
    pub fn filters(&self) -> &UserFilters {
        &self.filters
    }

    /// Current 1-based page.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Current page size.
    #[must_use]
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Monotonic counter bumped on every override write; renderers caching
    /// derived state use it as their invalidation signal.
    #[must_use]
    pub fn overrides_version(&self) -> u64 {
        self.overrides_version
    }
}
