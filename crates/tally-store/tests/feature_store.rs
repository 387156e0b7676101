//! A feature module wired end to end: one shared collection store, a list
//! view paginating it, and an edit drawer over one of its rows.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use serde_json::json;
use tally_core::drawer::{self, DrawerAction, EntityDrawerState};
use tally_core::pagination::{self, PaginationAction};
use tally_core::{paginate, PageWindow, ResultPair};
use tally_store::fetcher::from_pair;
use tally_store::{FetchError, Store, StoreStatus, TallyConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Category {
    id: u32,
    name: String,
}

fn category(id: u32, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
    }
}

static CATEGORY_FETCHES: AtomicUsize = AtomicUsize::new(0);

/// Module-scoped store, as a feature module would declare it.
fn categories() -> &'static Store<Vec<Category>> {
    static STORE: OnceLock<Store<Vec<Category>>> = OnceLock::new();
    STORE.get_or_init(|| {
        Store::collection("categories", || async {
            CATEGORY_FETCHES.fetch_add(1, Ordering::SeqCst);
            Ok::<_, FetchError>(vec![
                Some(category(1, "Groceries")),
                None,
                Some(category(2, "Rent")),
                Some(category(3, "Travel")),
                None,
                Some(category(4, "Utilities")),
                Some(category(5, "Dining")),
            ])
        })
    })
}

#[tokio::test]
async fn test_list_and_drawer_share_one_store() {
    // Two views mount at the same time.
    let list_view = categories().clone();
    let drawer_view = categories().clone();
    tokio::join!(list_view.ensure_loaded(), drawer_view.ensure_loaded());

    assert_eq!(CATEGORY_FETCHES.load(Ordering::SeqCst), 1);
    assert_eq!(list_view.status(), StoreStatus::Ready);
    assert_eq!(list_view.id(), drawer_view.id());

    // List view pages through the compacted collection.
    let config = TallyConfig::from_toml_str("[pagination]\ndefault_rows_per_page = 5\n").unwrap();
    let mut page_state = config.pagination.initial_state().unwrap();
    page_state = pagination::reduce_value(
        page_state,
        &json!({ "type": "CHANGE_ROWS_PER_PAGE", "rowsPerPage": 2 }),
    )
    .unwrap();
    page_state = pagination::reduce(page_state, PaginationAction::ChangePage { page: 1 });

    let visible = list_view.with_data(|rows| paginate(rows, &page_state).to_vec());
    assert_eq!(visible, vec![category(3, "Travel"), category(4, "Utilities")]);

    let window = list_view.with_data(|rows| PageWindow::new(rows.len(), &page_state));
    assert_eq!(window.to_string(), "3-4 of 5");
    assert!(window.has_next());

    // Drawer opens on a row, the edit is applied optimistically.
    let mut drawer_state = EntityDrawerState::new();
    drawer_state = drawer::reduce(drawer_state, DrawerAction::open(visible[0].clone()));
    assert!(drawer_state.is_editing());

    let mut edited = drawer_state.payload.clone().unwrap();
    edited.name = "Holidays".to_string();
    drawer_view.update(|rows| {
        if let Some(row) = rows.iter_mut().find(|row| row.id == edited.id) {
            *row = edited.clone();
        }
    });
    drawer_state = drawer::reduce(drawer_state, DrawerAction::Close);

    assert!(!drawer_state.shown);
    assert_eq!(drawer_state.payload.as_ref().map(|c| c.id), Some(3));
    assert_eq!(list_view.data()[2].name, "Holidays");
}

#[tokio::test]
async fn test_failed_refresh_keeps_rows_visible() {
    let healthy = Arc::new(AtomicUsize::new(1));
    let gate = Arc::clone(&healthy);

    let methods = Store::new(
        "payment_methods",
        from_pair(move || {
            let healthy = gate.load(Ordering::SeqCst) == 1;
            async move {
                if healthy {
                    ResultPair::ok(vec!["Card".to_string(), "Cash".to_string()])
                } else {
                    ResultPair::err(FetchError::remote("503 Service Unavailable"))
                }
            }
        }),
        Vec::new(),
    );

    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = methods.subscribe(move |snapshot| sink.lock().push(snapshot.status()));

    methods.refetch().await;
    healthy.store(0, Ordering::SeqCst);
    methods.refetch().await;

    assert_eq!(methods.data(), vec!["Card".to_string(), "Cash".to_string()]);
    assert_eq!(methods.error(), Some(FetchError::remote("503 Service Unavailable")));
    assert!(methods.error().is_some_and(|e| e.is_retryable()));
    assert_eq!(
        *seen.lock(),
        vec![
            StoreStatus::Loading,
            StoreStatus::Ready,
            StoreStatus::Loading,
            StoreStatus::Failed,
        ]
    );

    assert!(subscription.unsubscribe());
    assert_eq!(methods.listener_count(), 0);
}

#[tokio::test]
async fn test_sparse_collection_is_compacted() {
    let store = Store::collection("quotes", || async {
        Ok::<_, FetchError>(vec![Some(1), None, Some(2)])
    });

    store.refetch().await;
    assert_eq!(store.data(), vec![1, 2]);
}

#[test]
fn test_drawer_actions_from_frontend_json() {
    let state: EntityDrawerState<Category> = drawer::reduce_value(
        EntityDrawerState::new(),
        &json!({ "type": "open", "payload": { "id": 7, "name": "Gifts" } }),
    )
    .unwrap();

    assert_eq!(
        state,
        EntityDrawerState {
            shown: true,
            payload: Some(category(7, "Gifts")),
        }
    );
}
