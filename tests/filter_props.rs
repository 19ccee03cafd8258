use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use notes_hub::types::filter::{AdminFilter, VisibilityFilter};
use notes_hub::types::note::Note;

fn note(title: String, content: String, is_public: bool) -> Note {
    Note {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        title,
        content,
        user_id: Uuid::new_v4(),
        is_public,
    }
}

fn notes_strategy() -> impl Strategy<Value = Vec<Note>> {
    proptest::collection::vec(("[a-cA-C ]{0,8}", "[a-cA-C ]{0,12}", any::<bool>()), 0..20)
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(title, content, is_public)| note(title, content, is_public))
                .collect()
        })
}

fn visibility_strategy() -> impl Strategy<Value = VisibilityFilter> {
    prop_oneof![
        Just(VisibilityFilter::All),
        Just(VisibilityFilter::Public),
        Just(VisibilityFilter::Private),
    ]
}

proptest! {
    #[test]
    fn prop_filtered_is_an_ordered_subset(
        notes in notes_strategy(),
        q in "[a-cA-C]{0,3}",
        visibility in visibility_strategy(),
    ) {
        let filter = AdminFilter { q, visibility };
        let shown = filter.apply(&notes);
        prop_assert!(shown.len() <= notes.len());

        // Same relative order as the input.
        let mut positions = shown
            .iter()
            .map(|s| notes.iter().position(|n| n.id == s.id).unwrap());
        let mut last = None;
        for pos in &mut positions {
            prop_assert!(last.map_or(true, |l| l < pos));
            last = Some(pos);
        }
    }

    #[test]
    fn prop_longer_search_never_shows_more(
        notes in notes_strategy(),
        q in "[a-c]{0,2}",
        extra in "[a-c]{1,2}",
    ) {
        let broad = AdminFilter { q: q.clone(), visibility: VisibilityFilter::All };
        let narrow = AdminFilter { q: format!("{}{}", q, extra), visibility: VisibilityFilter::All };
        let broad_ids: Vec<Uuid> = broad.apply(&notes).iter().map(|n| n.id).collect();
        for n in narrow.apply(&notes) {
            prop_assert!(broad_ids.contains(&n.id));
        }
    }

    #[test]
    fn prop_public_and_private_partition_all(
        notes in notes_strategy(),
        q in "[a-c]{0,2}",
    ) {
        let count = |visibility| AdminFilter { q: q.clone(), visibility }.apply(&notes).len();
        prop_assert_eq!(
            count(VisibilityFilter::Public) + count(VisibilityFilter::Private),
            count(VisibilityFilter::All)
        );
    }

    #[test]
    fn prop_search_ignores_case(
        notes in notes_strategy(),
        q in "[a-c]{1,3}",
    ) {
        let lower = AdminFilter { q: q.clone(), visibility: VisibilityFilter::All };
        let upper = AdminFilter { q: q.to_uppercase(), visibility: VisibilityFilter::All };
        prop_assert_eq!(lower.apply(&notes), upper.apply(&notes));
    }
}

#[test]
fn empty_filter_shows_everything() {
    let notes = vec![
        note("a".to_string(), "b".to_string(), true),
        note("c".to_string(), "d".to_string(), false),
    ];
    assert_eq!(AdminFilter::default().apply(&notes).len(), 2);
}
