//! Nursing Activities Score.
//!
//! Input is a map of `item_<id>` → selected. Exclusive groups are checked
//! before anything is summed; a conflicting selection is rejected, never
//! resolved by picking one of the items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tables::{NasItem, ScoringTables, NAS_ITEMS};
use super::ScoringError;

label_enum!(
    /// Workload band for a NAS total.
    CargaNas {
        Baja => "baja",
        Moderada => "moderada",
        Alta => "alta",
        MuyAlta => "muyAlta",
    }
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NasChecklist {
    #[serde(default)]
    pub selecciones: BTreeMap<String, bool>,
}

impl NasChecklist {
    /// Checklist with the given item ids (without the `item_` prefix) selected.
    pub fn with_items(ids: &[&str]) -> Self {
        Self {
            selecciones: ids.iter().map(|id| (format!("item_{id}"), true)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NasResult {
    pub puntuacion_total: f64,
    pub carga: CargaNas,
    pub items_seleccionados: Vec<String>,
}

fn find_item(key: &str) -> Option<&'static NasItem> {
    let id = key.strip_prefix("item_")?;
    NAS_ITEMS.iter().find(|it| it.id == id)
}

/// Compute the NAS total and workload band.
pub fn compute_nas(tables: &ScoringTables, checklist: &NasChecklist) -> Result<NasResult, ScoringError> {
    let mut seleccionados: Vec<&'static NasItem> = Vec::new();
    for (key, &selected) in &checklist.selecciones {
        let item = find_item(key)
            .ok_or_else(|| ScoringError::validation(key.as_str(), "unknown NAS item"))?;
        if selected {
            seleccionados.push(item);
        }
    }

    let mut por_grupo: BTreeMap<u8, Vec<&'static NasItem>> = BTreeMap::new();
    for item in seleccionados.iter().copied() {
        if let Some(grupo) = item.grupo {
            por_grupo.entry(grupo).or_default().push(item);
        }
    }
    if let Some((grupo, items)) = por_grupo.iter().find(|(_, items)| items.len() > 1) {
        let conflicto: Vec<String> = items.iter().map(|it| format!("item_{}", it.id)).collect();
        return Err(ScoringError::validation(
            format!("grupo {grupo}"),
            format!("items {} are mutually exclusive", conflicto.join(", ")),
        ));
    }

    // Keep catalogue order in the output regardless of map ordering.
    seleccionados.sort_by_key(|it| NAS_ITEMS.iter().position(|c| c.id == it.id));

    let decimas: u32 = seleccionados.iter().map(|it| it.peso_decimas).sum();
    let puntuacion_total = f64::from(decimas) / 10.0;
    let carga = tables.nas_carga.points(puntuacion_total)?;

    Ok(NasResult {
        puntuacion_total,
        carga,
        items_seleccionados: seleccionados.iter().map(|it| format!("item_{}", it.id)).collect(),
    })
}
