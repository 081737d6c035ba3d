//! Kinesiology categorization: five ordinal domains scored 1, 3 or 5.

use serde::{Deserialize, Serialize};

use super::tables::{ScoringTables, KINE_VALORES_VALIDOS};
use super::ScoringError;

label_enum!(
    /// Complexity band for a kinesiology total.
    Complejidad {
        Baja => "Baja",
        Mediana => "Mediana",
        Alta => "Alta",
    }
);

impl Complejidad {
    /// Assistential-load descriptor; one label per band.
    pub fn carga_asistencial(self) -> &'static str {
        match self {
            Complejidad::Baja => "Baja carga asistencial",
            Complejidad::Mediana => "Mediana carga asistencial",
            Complejidad::Alta => "Alta carga asistencial",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesiologySubscores {
    pub patron_respiratorio: Option<i32>,
    pub asistencia_ventilatoria: Option<i32>,
    pub sas_glasgow: Option<i32>,
    pub tos_secreciones: Option<i32>,
    pub asistencia: Option<i32>,
}

impl KinesiologySubscores {
    pub fn new(values: [i32; 5]) -> Self {
        let [a, b, c, d, e] = values;
        Self {
            patron_respiratorio: Some(a),
            asistencia_ventilatoria: Some(b),
            sas_glasgow: Some(c),
            tos_secreciones: Some(d),
            asistencia: Some(e),
        }
    }

    fn named(&self) -> [(&'static str, Option<i32>); 5] {
        [
            ("patronRespiratorio", self.patron_respiratorio),
            ("asistenciaVentilatoria", self.asistencia_ventilatoria),
            ("sasGlasgow", self.sas_glasgow),
            ("tosSecreciones", self.tos_secreciones),
            ("asistencia", self.asistencia),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesiologyCategorization {
    pub puntaje_total: u8,
    pub complejidad: Complejidad,
    pub carga_asistencial: String,
}

pub fn compute_categorization(
    tables: &ScoringTables,
    subscores: &KinesiologySubscores,
) -> Result<KinesiologyCategorization, ScoringError> {
    let mut total: i32 = 0;
    for (field, value) in subscores.named() {
        let v = value.ok_or_else(|| ScoringError::validation(field, "value is required"))?;
        if !KINE_VALORES_VALIDOS.contains(&v) {
            return Err(ScoringError::validation(
                field,
                format!("must be one of 1, 3 or 5 (got {v})"),
            ));
        }
        total += v;
    }

    let complejidad = tables.kinesiologia.points(f64::from(total))?;
    let puntaje_total = u8::try_from(total)
        .map_err(|_| ScoringError::OutOfRange { field: "puntajeTotal".into(), value: f64::from(total) })?;

    Ok(KinesiologyCategorization {
        puntaje_total,
        complejidad,
        carga_asistencial: complejidad.carga_asistencial().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tables() -> ScoringTables {
        ScoringTables::standard().unwrap()
    }

    #[test]
    fn all_fives_is_high_complexity() {
        let r = compute_categorization(&tables(), &KinesiologySubscores::new([5; 5])).unwrap();
        assert_eq!(r.puntaje_total, 25);
        assert_eq!(r.complejidad, Complejidad::Alta);
        assert_eq!(r.carga_asistencial, "Alta carga asistencial");
    }

    #[test]
    fn all_ones_is_low_complexity() {
        let r = compute_categorization(&tables(), &KinesiologySubscores::new([1; 5])).unwrap();
        assert_eq!(r.puntaje_total, 5);
        assert_eq!(r.complejidad, Complejidad::Baja);
    }

    #[test]
    fn band_boundaries() {
        let t = tables();
        let band = |v| compute_categorization(&t, &KinesiologySubscores::new(v)).unwrap();
        assert_eq!(band([1, 1, 3, 3, 3]).complejidad, Complejidad::Baja); // 11
        assert_eq!(band([1, 1, 1, 3, 5]).complejidad, Complejidad::Baja); // 11
        assert_eq!(band([3, 3, 3, 3, 1]).complejidad, Complejidad::Mediana); // 13
        assert_eq!(band([5, 5, 3, 3, 1]).complejidad, Complejidad::Mediana); // 17
        assert_eq!(band([5, 5, 5, 3, 1]).complejidad, Complejidad::Alta); // 19
    }

    #[test]
    fn value_outside_scale_names_field() {
        let s = KinesiologySubscores::new([1, 3, 2, 5, 5]);
        let err = compute_categorization(&tables(), &s).unwrap_err();
        assert_eq!(err.field(), "sasGlasgow");
    }

    #[test]
    fn missing_subscore_names_field() {
        let s = KinesiologySubscores {
            tos_secreciones: None,
            ..KinesiologySubscores::new([3; 5])
        };
        let err = compute_categorization(&tables(), &s).unwrap_err();
        assert_eq!(err.field(), "tosSecreciones");
    }

    #[test]
    fn complejidad_str_roundtrip() {
        for c in [Complejidad::Baja, Complejidad::Mediana, Complejidad::Alta] {
            assert_eq!(c.as_str().parse::<Complejidad>().unwrap(), c);
            assert_eq!(serde_json::to_value(c).unwrap(), c.as_str());
        }
    }

    fn ordinal() -> impl Strategy<Value = i32> {
        prop_oneof![Just(1), Just(3), Just(5)]
    }

    proptest! {
        #[test]
        fn total_in_range_and_band_monotonic(
            a in proptest::array::uniform5(ordinal()),
            b in proptest::array::uniform5(ordinal()),
        ) {
            let t = tables();
            let ra = compute_categorization(&t, &KinesiologySubscores::new(a)).unwrap();
            let rb = compute_categorization(&t, &KinesiologySubscores::new(b)).unwrap();
            prop_assert!((5..=25).contains(&ra.puntaje_total));
            if ra.puntaje_total <= rb.puntaje_total {
                prop_assert!(ra.complejidad <= rb.complejidad);
            } else {
                prop_assert!(ra.complejidad >= rb.complejidad);
            }
        }
    }
}
