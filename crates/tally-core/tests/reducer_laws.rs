use proptest::prelude::*;
use proptest::test_runner::Config;
use serde_json::json;
use tally_core::drawer::{self, DrawerAction, EntityDrawerState};
use tally_core::pagination::{self, PaginationAction};
use tally_core::{paginate, CoreError, PaginationState};

fn pagination_state() -> impl Strategy<Value = PaginationState> {
    (0_usize..10_000, 1_usize..500)
        .prop_map(|(page, rows)| PaginationState::new(page, rows).expect("rows > 0"))
}

fn drawer_state() -> impl Strategy<Value = EntityDrawerState<u32>> {
    (any::<bool>(), proptest::option::of(any::<u32>()))
        .prop_map(|(shown, payload)| EntityDrawerState { shown, payload })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn slicing_is_idempotent(
        data in proptest::collection::vec(any::<i64>(), 0..200),
        state in pagination_state()
    ) {
        prop_assert_eq!(paginate(&data, &state), paginate(&data, &state));
    }

    #[test]
    fn slice_is_contiguous_and_bounded(
        data in proptest::collection::vec(any::<u16>(), 0..200),
        state in pagination_state()
    ) {
        let page = paginate(&data, &state);
        prop_assert!(page.len() <= state.rows());
        if !page.is_empty() {
            let start = state.page * state.rows();
            prop_assert_eq!(page, &data[start..start + page.len()]);
        }
    }

    #[test]
    fn changing_rows_per_page_resets_page(state in pagination_state(), rows in 1_usize..1_000) {
        let next = pagination::reduce_value(
            state,
            &json!({ "type": "CHANGE_ROWS_PER_PAGE", "rowsPerPage": rows }),
        ).expect("valid action");
        prop_assert_eq!(next.page, 0);
        prop_assert_eq!(next.rows(), rows);
    }

    #[test]
    fn change_page_keeps_rows_per_page(state in pagination_state(), page in any::<usize>()) {
        let next = pagination::reduce(state, PaginationAction::ChangePage { page });
        prop_assert_eq!(next.rows_per_page, state.rows_per_page);
        prop_assert_eq!(next.page, page);
    }

    #[test]
    fn unknown_pagination_action_fails_for_every_state(
        state in pagination_state(),
        tag in "[a-z_]{1,12}"
    ) {
        let err = pagination::reduce_value(state, &json!({ "type": tag.clone() })).unwrap_err();
        prop_assert_eq!(err, CoreError::InvalidAction { reducer: "pagination", action: tag });
    }

    #[test]
    fn drawer_payload_survives_close_then_toggle(state in drawer_state(), payload in any::<u32>()) {
        let opened = drawer::reduce(state, DrawerAction::open(payload));
        let closed = drawer::reduce(opened, DrawerAction::Close);
        let toggled = drawer::reduce(closed, DrawerAction::Toggle);
        prop_assert!(toggled.shown);
        prop_assert_eq!(toggled.payload, Some(payload));
    }

    #[test]
    fn unknown_drawer_action_fails_for_every_state(
        state in drawer_state(),
        tag in "[A-Z_]{1,12}"
    ) {
        let result = drawer::reduce_value(state, &json!({ "type": tag }));
        let is_invalid_action = matches!(result, Err(CoreError::InvalidAction { .. }));
        prop_assert!(is_invalid_action);
    }
}
