//! Property-based tests for the merger
//!
//! These tests check that the merge invariants hold for arbitrary prior
//! states and arbitrary batches of candidate updates.

use super::merge::merge;
use super::parse::parse_candidates;
use crate::questionnaire::{
    CandidateUpdate, Experience, ItemStatus, QuestionId, QuestionnaireState,
};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_question_id() -> impl Strategy<Value = QuestionId> {
    (0..QuestionId::COUNT).prop_map(|i| QuestionId::ALL[i])
}

fn arb_experience() -> impl Strategy<Value = Experience> {
    prop_oneof![
        Just(Experience::Yes),
        Just(Experience::No),
        Just(Experience::Unknown),
    ]
}

fn arb_status() -> impl Strategy<Value = ItemStatus> {
    prop_oneof![
        Just(ItemStatus::Unanswered),
        Just(ItemStatus::Checking),
        Just(ItemStatus::Asking),
        Just(ItemStatus::Answered),
        Just(ItemStatus::Conflict),
    ]
}

fn arb_utterances() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z ]{1,12}", 0..4)
}

fn arb_nullable_text() -> impl Strategy<Value = Option<Option<String>>> {
    prop_oneof![
        Just(None),
        Just(Some(None)),
        "[a-z ]{1,12}".prop_map(|s| Some(Some(s))),
    ]
}

fn arb_state() -> impl Strategy<Value = QuestionnaireState> {
    (
        proptest::collection::vec(
            (arb_experience(), arb_status(), arb_utterances(), any::<bool>()),
            QuestionId::COUNT,
        ),
        proptest::option::of(arb_question_id()),
        proptest::option::of(arb_question_id()),
    )
        .prop_map(|(items, last_answered, last_asked)| {
            let mut state = QuestionnaireState::new();
            for (id, (experience, status, raw_user_input, updated)) in
                QuestionId::ALL.into_iter().zip(items)
            {
                let item = state.item_mut(id);
                item.experience = experience;
                item.status = status;
                item.raw_user_input = raw_user_input;
                item.updated = updated;
            }
            state.last_answered_question = last_answered;
            state.last_asked_question = last_asked;
            state
        })
}

fn arb_known_update() -> impl Strategy<Value = CandidateUpdate> {
    (
        arb_question_id(),
        proptest::option::of(arb_experience()),
        proptest::option::of(arb_status()),
        proptest::option::of(arb_utterances()),
        arb_nullable_text(),
        arb_nullable_text(),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(
            |(id, experience, status, raw_user_input, frequency, condition, updated)| {
                CandidateUpdate {
                    experience,
                    status,
                    raw_user_input,
                    frequency,
                    condition,
                    updated,
                    ..CandidateUpdate::new(id.as_str())
                }
            },
        )
}

fn arb_unknown_update() -> impl Strategy<Value = CandidateUpdate> {
    ("Q[1-9][1-9][0-9]?|X[0-9]|", proptest::option::of(any::<bool>())).prop_map(|(id, updated)| {
        CandidateUpdate {
            updated,
            status: Some(ItemStatus::Answered),
            ..CandidateUpdate::new(id)
        }
    })
}

fn arb_update() -> impl Strategy<Value = CandidateUpdate> {
    prop_oneof![
        4 => arb_known_update(),
        1 => arb_unknown_update(),
    ]
}

fn arb_updates() -> impl Strategy<Value = Vec<CandidateUpdate>> {
    proptest::collection::vec(arb_update(), 0..8)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // No updates: only the per-turn markers change
    #[test]
    fn prop_empty_updates_preserve_content(prior in arb_state()) {
        let result = merge(&prior, &[]);

        prop_assert!(result.applied.is_empty());
        prop_assert_eq!(result.last_answered, None);
        prop_assert_eq!(result.new_state.last_asked_question, prior.last_asked_question);
        for (before, after) in prior.items().zip(result.new_state.items()) {
            let mut expected = before.clone();
            expected.updated = false;
            prop_assert_eq!(after, &expected);
        }
    }

    // The prior state is never mutated
    #[test]
    fn prop_prior_is_untouched(prior in arb_state(), updates in arb_updates()) {
        let snapshot = prior.clone();
        let _ = merge(&prior, &updates);
        prop_assert_eq!(prior, snapshot);
    }

    // Same inputs, same output
    #[test]
    fn prop_merge_is_deterministic(prior in arb_state(), updates in arb_updates()) {
        prop_assert_eq!(merge(&prior, &updates), merge(&prior, &updates));
    }

    // rawUserInput only grows, and old entries keep their order
    #[test]
    fn prop_raw_user_input_is_append_only(prior in arb_state(), updates in arb_updates()) {
        let result = merge(&prior, &updates);
        for (before, after) in prior.items().zip(result.new_state.items()) {
            prop_assert!(
                after.raw_user_input.starts_with(&before.raw_user_input),
                "{:?} lost history: {:?} -> {:?}",
                before.question_id,
                before.raw_user_input,
                after.raw_user_input
            );
        }
    }

    // Exactly ten items, one per id, in canonical order
    #[test]
    fn prop_cardinality_is_fixed(prior in arb_state(), updates in arb_updates()) {
        let result = merge(&prior, &updates);
        let ids: Vec<_> = result.new_state.items().map(|item| item.question_id).collect();
        prop_assert_eq!(ids, QuestionId::ALL.to_vec());
    }

    // The last update flagged as answered names lastAnsweredQuestion
    #[test]
    fn prop_last_flagged_update_wins(prior in arb_state(), updates in arb_updates()) {
        let expected = updates
            .iter()
            .filter(|u| u.flags_answered())
            .filter_map(|u| u.target().ok())
            .last();

        let result = merge(&prior, &updates);
        prop_assert_eq!(result.last_answered, expected);
        prop_assert_eq!(result.new_state.last_answered_question, expected);
    }

    // Updates with unknown ids change nothing and are reported as skipped
    #[test]
    fn prop_unknown_ids_are_ignored(
        prior in arb_state(),
        unknown in proptest::collection::vec(arb_unknown_update(), 1..5),
    ) {
        let result = merge(&prior, &unknown);

        prop_assert!(result.applied.is_empty());
        prop_assert_eq!(result.skipped.len(), unknown.len());
        prop_assert_eq!(result.new_state, merge(&prior, &[]).new_state);
    }

    // `updated` is set on exactly the items an update landed on
    #[test]
    fn prop_updated_flags_track_applied(prior in arb_state(), updates in arb_updates()) {
        let result = merge(&prior, &updates);
        for item in result.new_state.items() {
            let touched = result
                .applied
                .iter()
                .any(|u| u.target().ok() == Some(item.question_id));
            prop_assert_eq!(item.updated, touched);
        }
    }

    // Parser never panics on arbitrary model output
    #[test]
    fn prop_parse_never_panics(raw in "\\PC{0,200}") {
        let _ = parse_candidates(&raw);
    }
}
