use serde::Serialize;

use crate::meals::repo::Meal;
use crate::users::imc::user_imc;
use crate::users::repo::User;

/// Diet statistics over one user's meals plus their IMC classification.
/// Derived on every request, never persisted.
#[derive(Debug, PartialEq, Serialize)]
pub struct Summary {
    #[serde(rename = "totalMeals")]
    pub total_meals: usize,
    #[serde(rename = "totalMealsInTheDiet")]
    pub total_meals_in_the_diet: usize,
    #[serde(rename = "totalMealsNotInTheDiet")]
    pub total_meals_not_in_the_diet: usize,
    #[serde(rename = "longestSequenceInTheDiet")]
    pub longest_sequence_in_the_diet: usize,
    pub imc: ImcSection,
}

/// IMC part of the summary. Both fields stay empty when the user record
/// could not be found; that degrades the summary, it does not fail it.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ImcSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'static str>,
}

/// Longest contiguous run of in-diet flags, in the order given.
pub fn longest_diet_streak<I>(flags: I) -> usize
where
    I: IntoIterator<Item = bool>,
{
    let mut best = 0;
    let mut current = 0;
    for in_the_diet in flags {
        if in_the_diet {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Assembles the summary from a single snapshot of meals. Counts and the
/// streak are tallied over the same list, so they always agree with each
/// other even if the store changes between requests.
pub fn build_summary(meals: &[Meal], user: Option<&User>) -> Summary {
    let total_meals = meals.len();
    let total_meals_in_the_diet = meals.iter().filter(|m| m.in_the_diet).count();
    let longest = longest_diet_streak(meals.iter().map(|m| m.in_the_diet));

    let imc = match user_imc(user) {
        Some(imc) => ImcSection {
            imc: Some(imc.imc),
            category: Some(imc.category),
        },
        None => ImcSection::default(),
    };

    Summary {
        total_meals,
        total_meals_in_the_diet,
        total_meals_not_in_the_diet: total_meals - total_meals_in_the_diet,
        longest_sequence_in_the_diet: longest,
        imc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn meals_with_flags(flags: &[bool]) -> Vec<Meal> {
        let user_id = Uuid::new_v4();
        flags
            .iter()
            .map(|&in_the_diet| Meal {
                id: Uuid::new_v4(),
                name: "meal".into(),
                description: "desc".into(),
                date: OffsetDateTime::UNIX_EPOCH,
                in_the_diet,
                user_id,
                created_at: OffsetDateTime::UNIX_EPOCH,
            })
            .collect()
    }

    fn user_with(height: f64, weight: f64) -> User {
        User {
            id: Uuid::new_v4(),
            name: "test".into(),
            email: "test@example.com".into(),
            password_hash: "hash".into(),
            height,
            weight,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn streak_of_empty_sequence_is_zero() {
        assert_eq!(longest_diet_streak([]), 0);
    }

    #[test]
    fn streak_counts_full_run() {
        assert_eq!(longest_diet_streak([true, true, true]), 3);
    }

    #[test]
    fn streak_resets_on_off_diet_meal() {
        assert_eq!(longest_diet_streak([true, false, true, true]), 2);
    }

    #[test]
    fn streak_with_no_diet_meals_is_zero() {
        assert_eq!(longest_diet_streak([false, false]), 0);
    }

    #[test]
    fn streak_never_exceeds_length() {
        let seqs: &[&[bool]] = &[
            &[],
            &[true],
            &[false],
            &[true, true, false, true],
            &[false, true, true, true, false, true],
        ];
        for seq in seqs {
            assert!(longest_diet_streak(seq.iter().copied()) <= seq.len());
        }
    }

    #[test]
    fn summary_tallies_and_streak_agree() {
        let meals = meals_with_flags(&[true, true, false]);
        let user = user_with(1.54, 65.0);
        let summary = build_summary(&meals, Some(&user));

        assert_eq!(summary.total_meals, 3);
        assert_eq!(summary.total_meals_in_the_diet, 2);
        assert_eq!(summary.total_meals_not_in_the_diet, 1);
        assert_eq!(
            summary.total_meals,
            summary.total_meals_in_the_diet + summary.total_meals_not_in_the_diet
        );
        assert_eq!(summary.longest_sequence_in_the_diet, 2);
        assert_eq!(summary.imc.imc, Some(27.41));
        assert_eq!(summary.imc.category, Some("Overweight"));
    }

    #[test]
    fn summary_with_no_meals_still_carries_imc() {
        let user = user_with(1.7, 70.0);
        let summary = build_summary(&[], Some(&user));

        assert_eq!(summary.total_meals, 0);
        assert_eq!(summary.total_meals_in_the_diet, 0);
        assert_eq!(summary.total_meals_not_in_the_diet, 0);
        assert_eq!(summary.longest_sequence_in_the_diet, 0);
        // 70 / 1.7^2 = 24.2214... -> 24.22
        assert_eq!(summary.imc.imc, Some(24.22));
        assert_eq!(summary.imc.category, Some("Normal weight"));
    }

    #[test]
    fn summary_for_unknown_user_has_empty_imc() {
        let summary = build_summary(&[], None);
        assert_eq!(summary.imc, ImcSection::default());
    }

    #[test]
    fn summary_wire_shape_is_camel_cased() {
        let meals = meals_with_flags(&[true]);
        let summary = build_summary(&meals, None);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["totalMeals"], 1);
        assert_eq!(json["totalMealsInTheDiet"], 1);
        assert_eq!(json["totalMealsNotInTheDiet"], 0);
        assert_eq!(json["longestSequenceInTheDiet"], 1);
        // unknown user serializes an empty imc object, not null
        assert_eq!(json["imc"], serde_json::json!({}));
    }
}
