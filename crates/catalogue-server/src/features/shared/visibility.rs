//! Who sees what

use crate::api::AppState;
use crate::domain::{Bundle, ResourcePayload};
use crate::error::CatalogueResult;
use crate::search::{FacetFilter, Paging};
use crate::security::Authentication;

/// Scope a list of originals to what `auth` may browse
///
/// Portal administrators and the onboarding team see every status, everyone
/// else only approved bundles.
pub fn restrict_list<T: ResourcePayload>(auth: &Authentication, filter: &mut FacetFilter) {
    filter.set_filter("published", "false");
    if !auth.is_admin_or_epot() {
        filter.set_filter("status", T::STATES.approved);
    }
}

/// Strip contact details unless `auth` administers `provider_id`
pub async fn reveal<T: ResourcePayload>(
    state: &AppState,
    auth: &Authentication,
    mut bundle: Bundle<T>,
    provider_id: Option<&str>,
) -> CatalogueResult<Bundle<T>> {
    let allowed = auth.is_admin_or_epot()
        || match provider_id {
            Some(provider_id) => state.security.has_admin_access(auth, provider_id).await?,
            None => false,
        };
    if !allowed {
        bundle.strip_sensitive();
    }
    Ok(bundle)
}

/// [`reveal`] for every result of a page
pub async fn reveal_all<T, F>(
    state: &AppState,
    auth: &Authentication,
    page: Paging<Bundle<T>>,
    provider_of: F,
) -> CatalogueResult<Paging<Bundle<T>>>
where
    T: ResourcePayload,
    F: Fn(&Bundle<T>) -> Option<String>,
{
    if auth.is_admin_or_epot() {
        return Ok(page);
    }
    let mut results = Vec::with_capacity(page.results.len());
    for bundle in page.results {
        let provider_id = provider_of(&bundle);
        results.push(reveal(state, auth, bundle, provider_id.as_deref()).await?);
    }
    Ok(Paging {
        results,
        ..page
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::states::PROVIDER_STATES;
    use crate::domain::Provider;
    use crate::features::shared::test_helpers::TestContext;

    #[test]
    fn test_restrict_list() {
        let mut filter = FacetFilter::default().with_filter("status", PROVIDER_STATES.pending);
        restrict_list::<Provider>(&Authentication::Anonymous, &mut filter);
        assert_eq!(filter.filters["status"], vec![PROVIDER_STATES.approved]);
        assert_eq!(filter.filters["published"], vec!["false"]);

        let mut filter = FacetFilter::default().with_filter("status", PROVIDER_STATES.pending);
        restrict_list::<Provider>(&TestContext::admin(), &mut filter);
        assert_eq!(filter.filters["status"], vec![PROVIDER_STATES.pending]);
    }

    #[tokio::test]
    async fn test_reveal_strips_for_outsiders() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;

        let seen = reveal(&ctx.state, &Authentication::Anonymous, provider.clone(), Some("athena"))
            .await
            .unwrap();
        assert!(seen.payload.users.is_empty());
        assert!(seen.logging_info.is_empty());

        let seen = reveal(&ctx.state, &TestContext::owner(), provider, Some("athena"))
            .await
            .unwrap();
        assert_eq!(seen.payload.users.len(), 1);
    }
}
