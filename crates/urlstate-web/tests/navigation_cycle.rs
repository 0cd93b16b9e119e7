//! End-to-end: URL mutations drive resource revalidation.
//!
//! A `MemoryHistory` location feeds a resource whose producer decodes the
//! query and "fetches" rows. Every mutation goes through `UrlUpdater`.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::FutureExt;
use urlstate_core::{PageUrl, QueryConfig, QueryReader, SortKey, sort_keys};
use urlstate_runtime::{ProducerError, Resource, Status};
use urlstate_web::{MemoryHistory, Navigator, UpdaterConfig, UrlUpdater};

sort_keys! {
    enum Sort {
        #[default]
        Name => "name",
        Revenue => "revenue",
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Page {
    sort: &'static str,
    offset: u64,
    limit: u32,
}

fn fetch(url: &PageUrl) -> Result<Page, ProducerError> {
    let config = QueryConfig::default();
    let reader = QueryReader::from_url(url, &config);
    let state = reader
        .state::<Sort>(&[])
        .map_err(|e| ProducerError::with_source("bad query", e))?;
    Ok(Page {
        sort: state.order_by.as_str(),
        offset: state.offset(),
        limit: state.limit,
    })
}

#[test]
fn every_navigation_revalidates() {
    let mut pool = LocalPool::new();
    let history = MemoryHistory::new("/screener?page=3");
    let updater = UrlUpdater::new(history.clone(), UpdaterConfig::default());

    let resource = Resource::derived(pool.spawner(), &history.location_signal(), |url: PageUrl| {
        futures::future::ready(fetch(&url))
    });
    pool.run_until_stalled();
    assert_eq!(
        resource.data().as_deref(),
        Some(&Page { sort: "name", offset: 100, limit: 50 })
    );

    updater.set_query("sort", "revenue").unwrap();
    pool.run_until_stalled();
    assert_eq!(
        resource.data().as_deref(),
        Some(&Page { sort: "revenue", offset: 0, limit: 50 }),
        "sorting resets pagination"
    );

    updater.set_query("page", 2u32).unwrap();
    pool.run_until_stalled();
    assert_eq!(resource.data().map(|p| p.offset), Some(50));
    assert_eq!(history.location().href(), "/screener?sort=revenue&page=2");
}

#[test]
fn invalid_url_surfaces_as_error_then_recovers() {
    let mut pool = LocalPool::new();
    let history = MemoryHistory::new("/screener");
    let updater = UrlUpdater::new(history.clone(), UpdaterConfig::default());
    let resource = Resource::derived(pool.spawner(), &history.location_signal(), |url: PageUrl| {
        futures::future::ready(fetch(&url))
    });
    pool.run_until_stalled();
    assert_eq!(resource.status(), Status::Success);

    updater.set_query("page", "zero").unwrap();
    pool.run_until_stalled();
    assert_eq!(resource.status(), Status::Error);
    assert!(resource.data().is_none());

    assert!(history.back());
    pool.run_until_stalled();
    assert_eq!(resource.status(), Status::Success);
    assert_eq!(resource.data().map(|p| p.offset), Some(0));
}

#[test]
fn slow_response_for_old_url_never_wins() {
    let mut pool = LocalPool::new();
    let history = MemoryHistory::new("/screener?sort=name");
    let updater = UrlUpdater::new(history.clone(), UpdaterConfig::default());

    let replies: Rc<RefCell<Vec<(String, oneshot::Sender<()>)>>> = Rc::default();
    let queue = Rc::clone(&replies);
    let resource = Resource::derived(pool.spawner(), &history.location_signal(), move |url: PageUrl| {
        let (tx, rx) = oneshot::channel();
        queue.borrow_mut().push((url.href(), tx));
        async move {
            match rx.await {
                Ok(()) => fetch(&url),
                Err(_) => Err(ProducerError::new("aborted")),
            }
        }
        .boxed_local()
    });

    updater.set_query("sort", "revenue").unwrap();
    let mut pending = std::mem::take(&mut *replies.borrow_mut());
    assert_eq!(pending.len(), 2);

    let (newest_href, newest) = pending.pop().unwrap();
    assert_eq!(newest_href, "/screener?sort=revenue");
    newest.send(()).unwrap();
    pool.run_until_stalled();
    assert_eq!(resource.data().map(|p| p.sort), Some("revenue"));
    assert!(resource.revalidating());

    let (_, oldest) = pending.pop().unwrap();
    oldest.send(()).unwrap();
    pool.run_until_stalled();
    assert_eq!(resource.data().map(|p| p.sort), Some("revenue"));
    assert!(!resource.revalidating());
}
