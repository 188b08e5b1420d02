use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::meals::repo::Meal;
use crate::meals::summary::Summary;

/// Request body for creating or replacing a meal.
#[derive(Debug, Deserialize)]
pub struct MealRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(rename = "inTheDiet")]
    pub in_the_diet: bool,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub meal: Meal,
}

#[derive(Debug, Serialize)]
pub struct MealsResponse {
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    #[test]
    fn meal_request_parses_camel_case_wire_shape() {
        let body = r#"{
            "name": "Breakfast",
            "description": "Oats",
            "date": "2023-12-07T08:00:00Z",
            "inTheDiet": true
        }"#;
        let req: MealRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.name, "Breakfast");
        assert!(req.in_the_diet);
        assert_eq!(req.date, datetime!(2023-12-07 08:00 UTC));
    }

    #[test]
    fn meal_serializes_in_the_diet_flag_camel_cased() {
        let meal = Meal {
            id: Uuid::new_v4(),
            name: "Lunch".into(),
            description: "Salad".into(),
            date: datetime!(2023-12-07 12:00 UTC),
            in_the_diet: true,
            user_id: Uuid::new_v4(),
            created_at: datetime!(2023-12-07 12:01 UTC),
        };
        let json = serde_json::to_string(&MealResponse { meal }).unwrap();
        assert!(json.contains(r#""inTheDiet":true"#));
        assert!(!json.contains("in_the_diet"));
    }
}
