use serde::Serialize;

use crate::users::repo::User;

/// Body-mass-index value plus its category band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Imc {
    pub imc: f64,
    pub category: &'static str,
}

/// Rounds half away from zero to two decimal places.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Maps a rounded IMC value to its band, first match wins.
///
/// The bands are checked against the already rounded value, so values
/// that round into a gap (e.g. 24.95) fall through to "Out of Range".
pub fn imc_category(imc: f64) -> &'static str {
    if imc < 18.5 {
        "Underweight"
    } else if (18.5..=24.9).contains(&imc) {
        "Normal weight"
    } else if (25.0..=29.9).contains(&imc) {
        "Overweight"
    } else if (30.0..=34.9).contains(&imc) {
        "Obesity Class I"
    } else if (35.0..=39.9).contains(&imc) {
        "Obesity Class II"
    } else if imc >= 40.0 {
        "Obesity Class III (Morbid Obesity)"
    } else {
        "Out of Range"
    }
}

/// Computes IMC for a user, or None when the user lookup came up empty.
/// A missing user is not an error here, the summary just omits the IMC.
pub fn user_imc(user: Option<&User>) -> Option<Imc> {
    let user = user?;
    let imc = round2(user.weight / (user.height * user.height));
    Some(Imc {
        imc,
        category: imc_category(imc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

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
    fn computes_and_rounds_imc() {
        // 65 / 1.54^2 = 27.4076... -> 27.41
        let imc = user_imc(Some(&user_with(1.54, 65.0))).unwrap();
        assert_eq!(imc.imc, 27.41);
        assert_eq!(imc.category, "Overweight");
    }

    #[test]
    fn missing_user_yields_no_imc() {
        assert_eq!(user_imc(None), None);
    }

    #[test]
    fn band_lower_edges() {
        assert_eq!(imc_category(18.49), "Underweight");
        assert_eq!(imc_category(18.5), "Normal weight");
        assert_eq!(imc_category(25.0), "Overweight");
        assert_eq!(imc_category(30.0), "Obesity Class I");
        assert_eq!(imc_category(35.0), "Obesity Class II");
        assert_eq!(imc_category(40.0), "Obesity Class III (Morbid Obesity)");
        assert_eq!(imc_category(55.3), "Obesity Class III (Morbid Obesity)");
    }

    #[test]
    fn rounding_gap_values_fall_out_of_range() {
        assert_eq!(imc_category(24.95), "Out of Range");
        assert_eq!(imc_category(29.95), "Out of Range");
        assert_eq!(imc_category(34.95), "Out of Range");
        assert_eq!(imc_category(39.95), "Out of Range");
    }

    #[test]
    fn round2_is_half_away_from_zero() {
        // exact binary halves, no representation noise
        assert_eq!(super::round2(0.125), 0.13);
        assert_eq!(super::round2(-0.125), -0.13);
        assert_eq!(super::round2(27.404), 27.4);
    }
}
