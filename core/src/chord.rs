use std::collections::{BTreeMap, HashMap};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::types::TripEdge;

/// Rekkefølge på nodene (strendene) i matrisen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOrder {
    #[default]
    Alphabetical,
    /// Flest turer (ut + inn) først, alfabetisk ved likhet
    Popularity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChordMatrix {
    pub names: Vec<String>,
    /// matrix[i][j] = sum vekt fra i til j (retning beholdes)
    pub matrix: Vec<Vec<f64>>,
    /// for hver node: kildeindeksene til alle ikke-null celler i kolonnen
    pub sources_by_target: Vec<Vec<usize>>,
    pub launches: Vec<f64>,
    pub landings: Vec<f64>,
}

impl ChordMatrix {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Tooltip-tekst, f.eks. "3 launches 1 landing".
    pub fn node_title(&self, i: usize) -> String {
        let mut parts = Vec::new();
        let launches = self.launches.get(i).copied().unwrap_or(0.0);
        let landings = self.landings.get(i).copied().unwrap_or(0.0);
        if launches > 0.0 {
            parts.push(format!("{} {}", launches, pluralize(launches, "launch", "launches")));
        }
        if landings > 0.0 {
            parts.push(format!("{} {}", landings, pluralize(landings, "landing", "landings")));
        }
        parts.join(" ")
    }
}

fn pluralize<'a>(n: f64, singular: &'a str, plural: &'a str) -> &'a str {
    if n == 1.0 { singular } else { plural }
}

/// Bygger kvadratisk, rettet matrise fra en kantliste. Selvløkker
/// (samme start og slutt) havner på diagonalen.
pub fn build_chord(edges: &[TripEdge], order: NodeOrder) -> ChordMatrix {
    // BTreeMap gir alfabetisk startrekkefølge og deduplisering
    let mut popularity: BTreeMap<&str, f64> = BTreeMap::new();
    for e in edges {
        let w = e.weight();
        *popularity.entry(e.source.as_str()).or_default() += w;
        *popularity.entry(e.target.as_str()).or_default() += w;
    }

    let mut names: Vec<(&str, f64)> = popularity.into_iter().collect();
    if order == NodeOrder::Popularity {
        // stabil sortering: alfabetisk ved likhet
        names.sort_by_key(|(_, total)| std::cmp::Reverse(OrderedFloat(*total)));
    }

    let index: HashMap<&str, usize> = names.iter().enumerate().map(|(i, (n, _))| (*n, i)).collect();
    let n = names.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for e in edges {
        // begge finnes alltid i index
        if let (Some(&i), Some(&j)) = (index.get(e.source.as_str()), index.get(e.target.as_str())) {
            matrix[i][j] += e.weight();
        }
    }

    let sources_by_target: Vec<Vec<usize>> = (0..n)
        .map(|t| (0..n).filter(|&s| matrix[s][t] != 0.0).collect())
        .collect();
    let launches: Vec<f64> = matrix.iter().map(|row| row.iter().sum::<f64>()).collect();
    let landings: Vec<f64> = (0..n).map(|t| matrix.iter().map(|row| row[t]).sum::<f64>()).collect();

    log::debug!("build_chord: {} kanter, {} noder", edges.len(), n);

    ChordMatrix {
        names: names.into_iter().map(|(name, _)| name.to_string()).collect(),
        matrix,
        sources_by_target,
        launches,
        landings,
    }
}
