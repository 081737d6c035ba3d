//! Clinical threshold configuration.
//!
//! The only place where cut points, point tables and item weights are
//! written down. [`ScoringTables::standard`] builds and validates every
//! table; the service refuses to start if any of them is malformed.
//!
//! Sources: APACHE II per Knaus et al. (1985); NAS weights per Miranda et
//! al. (2003); Maslach Burnout Inventory (HSS) Spanish-adaptation cut points.

use super::apache2::NivelRiesgo;
use super::band::{Band, BandTable};
use super::burnout::NivelBurnout;
use super::kinesiologia::Complejidad;
use super::nas::CargaNas;
use super::ScoringError;

type Row<T> = (Option<f64>, Option<f64>, T);

fn table<T: Copy>(name: &'static str, rows: &[Row<T>]) -> Result<BandTable<T>, ScoringError> {
    BandTable::new(
        name,
        rows.iter()
            .map(|&(lower, upper, value)| Band::new(lower, upper, value))
            .collect(),
    )
}

// ═══════════════════════════════════════════════════════════
// APACHE II
// ═══════════════════════════════════════════════════════════

const TEMPERATURA: &[Row<u8>] = &[
    (None, Some(30.0), 4),
    (Some(30.0), Some(32.0), 3),
    (Some(32.0), Some(34.0), 2),
    (Some(34.0), Some(36.0), 1),
    (Some(36.0), Some(38.5), 0),
    (Some(38.5), Some(39.0), 1),
    (Some(39.0), Some(41.0), 3),
    (Some(41.0), None, 4),
];

const PRESION_ARTERIAL_MEDIA: &[Row<u8>] = &[
    (Some(0.0), Some(50.0), 4),
    (Some(50.0), Some(70.0), 2),
    (Some(70.0), Some(110.0), 0),
    (Some(110.0), Some(130.0), 2),
    (Some(130.0), Some(160.0), 3),
    (Some(160.0), None, 4),
];

const FRECUENCIA_CARDIACA: &[Row<u8>] = &[
    (Some(0.0), Some(40.0), 4),
    (Some(40.0), Some(55.0), 3),
    (Some(55.0), Some(70.0), 2),
    (Some(70.0), Some(110.0), 0),
    (Some(110.0), Some(140.0), 2),
    (Some(140.0), Some(180.0), 3),
    (Some(180.0), None, 4),
];

const FRECUENCIA_RESPIRATORIA: &[Row<u8>] = &[
    (Some(0.0), Some(6.0), 4),
    (Some(6.0), Some(10.0), 2),
    (Some(10.0), Some(12.0), 1),
    (Some(12.0), Some(25.0), 0),
    (Some(25.0), Some(35.0), 1),
    (Some(35.0), Some(50.0), 3),
    (Some(50.0), None, 4),
];

/// A-aDO2 (mmHg), used when FiO2 >= 0.5.
const GRADIENTE_AA: &[Row<u8>] = &[
    (Some(0.0), Some(200.0), 0),
    (Some(200.0), Some(350.0), 2),
    (Some(350.0), Some(500.0), 3),
    (Some(500.0), None, 4),
];

/// PaO2 (mmHg), used when FiO2 < 0.5.
const PAO2: &[Row<u8>] = &[
    (Some(0.0), Some(55.0), 4),
    (Some(55.0), Some(61.0), 3),
    (Some(61.0), Some(71.0), 1),
    (Some(71.0), None, 0),
];

const PH_ARTERIAL: &[Row<u8>] = &[
    (None, Some(7.15), 4),
    (Some(7.15), Some(7.25), 3),
    (Some(7.25), Some(7.33), 2),
    (Some(7.33), Some(7.5), 0),
    (Some(7.5), Some(7.6), 1),
    (Some(7.6), Some(7.7), 3),
    (Some(7.7), None, 4),
];

const SODIO: &[Row<u8>] = &[
    (Some(0.0), Some(111.0), 4),
    (Some(111.0), Some(120.0), 3),
    (Some(120.0), Some(130.0), 2),
    (Some(130.0), Some(150.0), 0),
    (Some(150.0), Some(155.0), 1),
    (Some(155.0), Some(160.0), 2),
    (Some(160.0), Some(180.0), 3),
    (Some(180.0), None, 4),
];

const POTASIO: &[Row<u8>] = &[
    (Some(0.0), Some(2.5), 4),
    (Some(2.5), Some(3.0), 2),
    (Some(3.0), Some(3.5), 1),
    (Some(3.5), Some(5.5), 0),
    (Some(5.5), Some(6.0), 1),
    (Some(6.0), Some(7.0), 3),
    (Some(7.0), None, 4),
];

/// Creatinine (mg/dL). Points double with acute renal failure.
const CREATININA: &[Row<u8>] = &[
    (Some(0.0), Some(0.6), 2),
    (Some(0.6), Some(1.5), 0),
    (Some(1.5), Some(2.0), 2),
    (Some(2.0), Some(3.5), 3),
    (Some(3.5), None, 4),
];

const HEMATOCRITO: &[Row<u8>] = &[
    (Some(0.0), Some(20.0), 4),
    (Some(20.0), Some(30.0), 2),
    (Some(30.0), Some(46.0), 0),
    (Some(46.0), Some(50.0), 1),
    (Some(50.0), Some(60.0), 2),
    (Some(60.0), None, 4),
];

/// White blood cells (x1000/mm3).
const LEUCOCITOS: &[Row<u8>] = &[
    (Some(0.0), Some(1.0), 4),
    (Some(1.0), Some(3.0), 2),
    (Some(3.0), Some(15.0), 0),
    (Some(15.0), Some(20.0), 1),
    (Some(20.0), Some(40.0), 2),
    (Some(40.0), None, 4),
];

const EDAD: &[Row<u8>] = &[
    (Some(0.0), Some(45.0), 0),
    (Some(45.0), Some(55.0), 2),
    (Some(55.0), Some(65.0), 3),
    (Some(65.0), Some(75.0), 5),
    (Some(75.0), None, 6),
];

pub const GLASGOW_MIN: u8 = 3;
pub const GLASGOW_MAX: u8 = 15;

pub const PUNTOS_CRONICO_ELECTIVO: u8 = 2;
pub const PUNTOS_CRONICO_NO_ELECTIVO: u8 = 5;

/// FiO2 at or above which oxygenation is read as A-aDO2.
pub const FIO2_UMBRAL_GRADIENTE: f64 = 0.5;

const NIVEL_RIESGO: &[Row<NivelRiesgo>] = &[
    (Some(0.0), Some(10.0), NivelRiesgo::Bajo),
    (Some(10.0), Some(20.0), NivelRiesgo::Moderado),
    (Some(20.0), Some(30.0), NivelRiesgo::Alto),
    (Some(30.0), None, NivelRiesgo::Critico),
];

const MORTALIDAD_ESTIMADA: &[Row<&str>] = &[
    (Some(0.0), Some(5.0), "~4%"),
    (Some(5.0), Some(10.0), "~8%"),
    (Some(10.0), Some(15.0), "~15%"),
    (Some(15.0), Some(20.0), "~25%"),
    (Some(20.0), Some(25.0), "~40%"),
    (Some(25.0), Some(30.0), "~55%"),
    (Some(30.0), Some(35.0), "~75%"),
    (Some(35.0), None, "~85%"),
];

// ═══════════════════════════════════════════════════════════
// NAS
// ═══════════════════════════════════════════════════════════

/// One NAS checklist item. Weights are stored in tenths of a point so
/// totals stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NasItem {
    pub id: &'static str,
    pub peso_decimas: u32,
    /// Items sharing a group are mutually exclusive.
    pub grupo: Option<u8>,
    pub descripcion: &'static str,
}

const fn item(id: &'static str, peso_decimas: u32, grupo: Option<u8>, descripcion: &'static str) -> NasItem {
    NasItem { id, peso_decimas, grupo, descripcion }
}

pub const NAS_ITEMS: &[NasItem] = &[
    item("1a", 45, Some(1), "Signos vitales horarios, registro y cálculo de balance hídrico"),
    item("1b", 121, Some(1), "Observación o actividad continua a pie de cama de 2 h o más en algún turno"),
    item("1c", 196, Some(1), "Observación o actividad continua a pie de cama de 4 h o más en algún turno"),
    item("2", 43, None, "Procedimientos de laboratorio, bioquímica y microbiología"),
    item("3", 56, None, "Medicación, excluidos fármacos vasoactivos"),
    item("4a", 41, Some(4), "Procedimientos de higiene habituales"),
    item("4b", 165, Some(4), "Procedimientos de higiene de más de 2 h en algún turno"),
    item("4c", 200, Some(4), "Procedimientos de higiene de más de 4 h en algún turno"),
    item("5", 18, None, "Cuidados de drenajes, excepto sonda gástrica"),
    item("6a", 55, Some(6), "Movilización y cambios posturales hasta 3 veces en 24 h"),
    item("6b", 124, Some(6), "Movilización más de 3 veces en 24 h o con 2 profesionales"),
    item("6c", 170, Some(6), "Movilización con 3 o más profesionales"),
    item("7a", 40, Some(7), "Apoyo a familiares y paciente durante una hora en algún turno"),
    item("7b", 320, Some(7), "Apoyo a familiares y paciente durante 3 h o más en algún turno"),
    item("8a", 42, Some(8), "Tareas administrativas y de gestión rutinarias"),
    item("8b", 232, Some(8), "Tareas administrativas y de gestión de 2 h en algún turno"),
    item("8c", 300, Some(8), "Tareas administrativas y de gestión de 4 h en algún turno"),
    item("9", 14, None, "Soporte respiratorio"),
    item("10", 18, None, "Cuidados de la vía aérea artificial"),
    item("11", 44, None, "Tratamiento para mejorar la función pulmonar"),
    item("12", 12, None, "Medicación vasoactiva"),
    item("13", 25, None, "Reposición intravenosa de grandes pérdidas de fluidos"),
    item("14", 17, None, "Monitorización de aurícula izquierda"),
    item("15", 71, None, "Reanimación cardiopulmonar en las últimas 24 h"),
    item("16", 77, None, "Técnicas de hemofiltración o diálisis"),
    item("17", 70, None, "Medición cuantitativa de diuresis"),
    item("18", 16, None, "Medición de presión intracraneal"),
    item("19", 13, None, "Tratamiento de complicaciones metabólicas"),
    item("20", 28, None, "Nutrición parenteral"),
    item("21", 13, None, "Nutrición enteral"),
    item("22", 28, None, "Intervenciones específicas en la unidad"),
    item("23", 19, None, "Intervenciones específicas fuera de la unidad"),
];

const CARGA_NAS: &[Row<CargaNas>] = &[
    (Some(0.0), Some(40.0), CargaNas::Baja),
    (Some(40.0), Some(60.0), CargaNas::Moderada),
    (Some(60.0), Some(80.0), CargaNas::Alta),
    (Some(80.0), None, CargaNas::MuyAlta),
];

// ═══════════════════════════════════════════════════════════
// Kinesiology categorization
// ═══════════════════════════════════════════════════════════

pub const KINE_VALORES_VALIDOS: [i32; 3] = [1, 3, 5];

const COMPLEJIDAD_KINE: &[Row<Complejidad>] = &[
    (Some(5.0), Some(12.0), Complejidad::Baja),
    (Some(12.0), Some(19.0), Complejidad::Mediana),
    (Some(19.0), Some(26.0), Complejidad::Alta),
];

// ═══════════════════════════════════════════════════════════
// Burnout inventory
// ═══════════════════════════════════════════════════════════

pub const BURNOUT_RESPUESTA_MIN: i32 = 0;
pub const BURNOUT_RESPUESTA_MAX: i32 = 6;

const AGOTAMIENTO_EMOCIONAL: &[Row<NivelBurnout>] = &[
    (Some(0.0), Some(19.0), NivelBurnout::Bajo),
    (Some(19.0), Some(27.0), NivelBurnout::Medio),
    (Some(27.0), Some(55.0), NivelBurnout::Alto),
];

const DESPERSONALIZACION: &[Row<NivelBurnout>] = &[
    (Some(0.0), Some(6.0), NivelBurnout::Bajo),
    (Some(6.0), Some(10.0), NivelBurnout::Medio),
    (Some(10.0), Some(31.0), NivelBurnout::Alto),
];

const REALIZACION_PERSONAL: &[Row<NivelBurnout>] = &[
    (Some(0.0), Some(34.0), NivelBurnout::Bajo),
    (Some(34.0), Some(40.0), NivelBurnout::Medio),
    (Some(40.0), Some(49.0), NivelBurnout::Alto),
];

// ═══════════════════════════════════════════════════════════
// Assembled tables
// ═══════════════════════════════════════════════════════════

pub struct Apache2Tables {
    pub temperatura: BandTable<u8>,
    pub presion_arterial_media: BandTable<u8>,
    pub frecuencia_cardiaca: BandTable<u8>,
    pub frecuencia_respiratoria: BandTable<u8>,
    pub gradiente_aa: BandTable<u8>,
    pub pao2: BandTable<u8>,
    pub ph_arterial: BandTable<u8>,
    pub sodio: BandTable<u8>,
    pub potasio: BandTable<u8>,
    pub creatinina: BandTable<u8>,
    pub hematocrito: BandTable<u8>,
    pub leucocitos: BandTable<u8>,
    pub glasgow: BandTable<u8>,
    pub edad: BandTable<u8>,
    pub nivel_riesgo: BandTable<NivelRiesgo>,
    pub mortalidad: BandTable<&'static str>,
}

pub struct BurnoutTables {
    pub agotamiento_emocional: BandTable<NivelBurnout>,
    pub despersonalizacion: BandTable<NivelBurnout>,
    pub realizacion_personal: BandTable<NivelBurnout>,
}

/// Every threshold table used by the engines, validated as a set.
pub struct ScoringTables {
    pub apache2: Apache2Tables,
    pub nas_carga: BandTable<CargaNas>,
    pub kinesiologia: BandTable<Complejidad>,
    pub burnout: BurnoutTables,
}

impl ScoringTables {
    /// Build the standard clinical tables. Fails with
    /// [`ScoringError::Configuration`] if any table is malformed.
    pub fn standard() -> Result<Self, ScoringError> {
        validate_nas_items(NAS_ITEMS)?;

        let tables = Self {
            apache2: Apache2Tables {
                temperatura: table("temperatura", TEMPERATURA)?,
                presion_arterial_media: table("presion_arterial_media", PRESION_ARTERIAL_MEDIA)?,
                frecuencia_cardiaca: table("frecuencia_cardiaca", FRECUENCIA_CARDIACA)?,
                frecuencia_respiratoria: table("frecuencia_respiratoria", FRECUENCIA_RESPIRATORIA)?,
                gradiente_aa: table("oxigenacion_gradiente_aa", GRADIENTE_AA)?,
                pao2: table("oxigenacion_pao2", PAO2)?,
                ph_arterial: table("ph_arterial", PH_ARTERIAL)?,
                sodio: table("sodio", SODIO)?,
                potasio: table("potasio", POTASIO)?,
                creatinina: table("creatinina", CREATININA)?,
                hematocrito: table("hematocrito", HEMATOCRITO)?,
                leucocitos: table("leucocitos", LEUCOCITOS)?,
                glasgow: glasgow_table()?,
                edad: table("edad", EDAD)?,
                nivel_riesgo: table("nivel_riesgo", NIVEL_RIESGO)?,
                mortalidad: table("mortalidad_estimada", MORTALIDAD_ESTIMADA)?,
            },
            nas_carga: table("carga_nas", CARGA_NAS)?,
            kinesiologia: table("complejidad_kinesiologia", COMPLEJIDAD_KINE)?,
            burnout: BurnoutTables {
                agotamiento_emocional: table("agotamiento_emocional", AGOTAMIENTO_EMOCIONAL)?,
                despersonalizacion: table("despersonalizacion", DESPERSONALIZACION)?,
                realizacion_personal: table("realizacion_personal", REALIZACION_PERSONAL)?,
            },
        };

        tracing::debug!("Scoring tables validated");
        Ok(tables)
    }

    /// `(table name, band count)` for every table, for diagnostics.
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        let a = &self.apache2;
        let mut out = vec![
            (a.temperatura.name(), a.temperatura.bands().len()),
            (a.presion_arterial_media.name(), a.presion_arterial_media.bands().len()),
            (a.frecuencia_cardiaca.name(), a.frecuencia_cardiaca.bands().len()),
            (a.frecuencia_respiratoria.name(), a.frecuencia_respiratoria.bands().len()),
            (a.gradiente_aa.name(), a.gradiente_aa.bands().len()),
            (a.pao2.name(), a.pao2.bands().len()),
            (a.ph_arterial.name(), a.ph_arterial.bands().len()),
            (a.sodio.name(), a.sodio.bands().len()),
            (a.potasio.name(), a.potasio.bands().len()),
            (a.creatinina.name(), a.creatinina.bands().len()),
            (a.hematocrito.name(), a.hematocrito.bands().len()),
            (a.leucocitos.name(), a.leucocitos.bands().len()),
            (a.glasgow.name(), a.glasgow.bands().len()),
            (a.edad.name(), a.edad.bands().len()),
            (a.nivel_riesgo.name(), a.nivel_riesgo.bands().len()),
            (a.mortalidad.name(), a.mortalidad.bands().len()),
            (self.nas_carga.name(), self.nas_carga.bands().len()),
            (self.kinesiologia.name(), self.kinesiologia.bands().len()),
        ];
        let b = &self.burnout;
        out.push((b.agotamiento_emocional.name(), b.agotamiento_emocional.bands().len()));
        out.push((b.despersonalizacion.name(), b.despersonalizacion.bands().len()));
        out.push((b.realizacion_personal.name(), b.realizacion_personal.bands().len()));
        out
    }
}

/// GCS 3..=15 scores `15 - GCS` points.
fn glasgow_table() -> Result<BandTable<u8>, ScoringError> {
    let bands = (GLASGOW_MIN..=GLASGOW_MAX)
        .map(|gcs| {
            let lower = f64::from(gcs);
            Band::new(Some(lower), Some(lower + 1.0), GLASGOW_MAX - gcs)
        })
        .collect();
    BandTable::new("glasgow", bands)
}

/// Item ids must be unique and every exclusive group needs at least two items.
fn validate_nas_items(items: &[NasItem]) -> Result<(), ScoringError> {
    let malformed = |message: String| ScoringError::Configuration {
        table: "nas_items".into(),
        message,
    };

    let mut seen = std::collections::HashSet::new();
    for it in items {
        if !seen.insert(it.id) {
            return Err(malformed(format!("duplicate item {}", it.id)));
        }
        if it.peso_decimas == 0 {
            return Err(malformed(format!("item {} has zero weight", it.id)));
        }
    }

    let mut group_sizes = std::collections::BTreeMap::<u8, usize>::new();
    for grupo in items.iter().filter_map(|it| it.grupo) {
        *group_sizes.entry(grupo).or_default() += 1;
    }
    if let Some((grupo, _)) = group_sizes.iter().find(|&(_, &n)| n < 2) {
        return Err(malformed(format!("exclusive group {grupo} has a single item")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_are_valid() {
        let tables = ScoringTables::standard().unwrap();
        assert_eq!(tables.summary().len(), 21);
    }

    #[test]
    fn glasgow_points_are_fifteen_minus_score() {
        let table = glasgow_table().unwrap();
        assert_eq!(table.points(15.0).unwrap(), 0);
        assert_eq!(table.points(13.0).unwrap(), 2);
        assert_eq!(table.points(3.0).unwrap(), 12);
        assert!(table.points(2.0).is_err());
        assert!(table.points(16.0).is_err());
    }

    #[test]
    fn nas_catalogue_has_thirty_two_items() {
        assert_eq!(NAS_ITEMS.len(), 32);
        let max: u32 = {
            // Highest weight per exclusive group plus every ungrouped item.
            let mut best = std::collections::BTreeMap::<u8, u32>::new();
            let mut ungrouped = 0;
            for it in NAS_ITEMS {
                match it.grupo {
                    Some(g) => {
                        let e = best.entry(g).or_default();
                        *e = (*e).max(it.peso_decimas);
                    }
                    None => ungrouped += it.peso_decimas,
                }
            }
            ungrouped + best.values().sum::<u32>()
        };
        assert_eq!(max, 1768);
    }

    #[test]
    fn duplicate_nas_item_is_configuration_error() {
        let items = [
            item("1a", 45, Some(1), "a"),
            item("1a", 121, Some(1), "b"),
        ];
        let err = validate_nas_items(&items).unwrap_err();
        assert!(matches!(err, ScoringError::Configuration { .. }));
    }

    #[test]
    fn singleton_exclusive_group_is_configuration_error() {
        let items = [item("7a", 40, Some(7), "a"), item("9", 14, None, "b")];
        assert!(validate_nas_items(&items).is_err());
    }

    #[test]
    fn risk_thresholds_at_boundaries() {
        let t = ScoringTables::standard().unwrap();
        let r = &t.apache2.nivel_riesgo;
        assert_eq!(r.points(9.0).unwrap(), NivelRiesgo::Bajo);
        assert_eq!(r.points(10.0).unwrap(), NivelRiesgo::Moderado);
        assert_eq!(r.points(19.0).unwrap(), NivelRiesgo::Moderado);
        assert_eq!(r.points(20.0).unwrap(), NivelRiesgo::Alto);
        assert_eq!(r.points(29.0).unwrap(), NivelRiesgo::Alto);
        assert_eq!(r.points(30.0).unwrap(), NivelRiesgo::Critico);
        assert_eq!(r.points(31.0).unwrap(), NivelRiesgo::Critico);
    }
}
