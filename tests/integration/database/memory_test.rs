//! Store contract on the in-memory backend

use ridehub::backend::store::Store;

use super::store_contract_tests;

store_contract_tests! {
    Some(Store::memory());
    get_or_create_is_order_independent,
    canonical_order_is_accepted_for_any_pair,
    like_then_unlike_restores_likes,
    follow_then_unfollow_restores_both_sets,
    membership_rules,
    comment_append_and_messages,
    delete_account_cascades,
    concurrent_get_or_create_converges,
    concurrent_like_toggles_are_not_lost,
    concurrent_follow_edges_stay_symmetric,
    concurrent_comments_all_land,
}
