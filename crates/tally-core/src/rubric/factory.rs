//! Construction of empty score trees
//!
//! Entity defaults live on the types themselves (`Rubric::new` and friends);
//! this module builds the score-card side: brand-new, all-unscored trees
//! that exactly shadow a given rubric. Each function is a pure function of
//! the rubric node it mirrors and never consults existing score state (the
//! reconciler owns that concern).

use chrono::Utc;

use crate::id;
use crate::rubric::types::{
    Rubric, RubricCategory, RubricCategoryScore, RubricItem, RubricItemScore, RubricScore,
};

/// Build an empty score node for one item, recursing into sub-items
pub fn make_item_score(item: &RubricItem) -> RubricItemScore {
    RubricItemScore {
        id: id::fresh_id(),
        item_id: item.id.clone(),
        score: None,
        comments: None,
        sub_items: item
            .sub_items
            .as_ref()
            .map(|sub_items| sub_items.iter().map(make_item_score).collect()),
        computed_score: None,
    }
}

/// Build an empty score node for one category
pub fn make_category_score(category: &RubricCategory) -> RubricCategoryScore {
    RubricCategoryScore {
        id: id::fresh_id(),
        category_id: category.id.clone(),
        items: category.items.iter().map(make_item_score).collect(),
        comments: None,
        computed_score: None,
    }
}

/// Build a brand-new, all-unscored score card shadowing the rubric
pub fn make_rubric_score(rubric: &Rubric) -> RubricScore {
    RubricScore {
        id: id::fresh_id(),
        rubric_id: rubric.id.clone(),
        name: rubric.name.clone(),
        student_id: None,
        student_name: None,
        course_id: None,
        course_name: None,
        grader: None,
        categories: rubric.categories.iter().map(make_category_score).collect(),
        comments: None,
        computed_score: None,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_score_shadows_item() {
        let item = RubricItem::new().with_id("i-1");
        let score = make_item_score(&item);
        assert_eq!(score.item_id, "i-1");
        assert_ne!(score.id, item.id);
        assert_eq!(score.score, None);
        assert_eq!(score.comments, None);
        assert!(score.sub_items.is_none());
    }

    #[test]
    fn test_item_score_mirrors_sub_items() {
        let item = RubricItem::new().with_id("parent").with_sub_items(vec![
            RubricItem::new().with_id("child-a"),
            RubricItem::new().with_id("child-b"),
        ]);
        let score = make_item_score(&item);
        let sub = score.sub_items.expect("sub-scores for a group item");
        assert_eq!(sub.len(), 2);
        assert_eq!(sub[0].item_id, "child-a");
        assert_eq!(sub[1].item_id, "child-b");
        assert!(sub.iter().all(|s| s.score.is_none()));
    }

    #[test]
    fn test_rubric_score_shadows_rubric() {
        let rubric = Rubric::new()
            .with_id("r-1")
            .with_name("Lab 3")
            .with_categories(vec![
                RubricCategory::new()
                    .with_id("c-1")
                    .with_items(vec![RubricItem::new().with_id("i-1")]),
                RubricCategory::new()
                    .with_id("c-2")
                    .with_items(vec![RubricItem::new().with_id("i-2")]),
            ]);
        let score = make_rubric_score(&rubric);
        assert_eq!(score.rubric_id, "r-1");
        assert_eq!(score.name, "Lab 3");
        assert_eq!(score.categories.len(), 2);
        assert_eq!(score.categories[0].category_id, "c-1");
        assert_eq!(score.categories[1].items[0].item_id, "i-2");
        assert!(score.computed_score.is_none());
        assert!(score.created_at.is_some());
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let rubric = Rubric::new().with_categories(vec![RubricCategory::new()
            .with_id("c")
            .with_items(vec![
                RubricItem::new().with_id("a"),
                RubricItem::new().with_id("b"),
            ])]);
        let score = make_rubric_score(&rubric);
        let category = &score.categories[0];
        assert_ne!(score.id, category.id);
        assert_ne!(category.items[0].id, category.items[1].id);
    }
}
