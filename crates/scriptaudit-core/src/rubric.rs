//! The fixed audit rubric: seven stages of a sales-call script, each with an
//! ordered checklist of criteria.
//!
//! The rubric is static data. Everything else in the system (session shape,
//! draft validation, export layout) is derived from it.

/// Highest score a single stage can receive.
pub const MAX_STAGE_SCORE: u32 = 5;

/// One stage of the rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDefinition {
    /// Stable unique identifier, used for draft validation and export.
    pub key: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Ordered checklist labels.
    pub criteria: &'static [&'static str],
}

/// The ordered catalog of stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rubric {
    stages: &'static [StageDefinition],
}

impl Rubric {
    /// The sales-call script rubric.
    pub fn standard() -> Self {
        Self { stages: STAGES }
    }

    pub fn stages(&self) -> &'static [StageDefinition] {
        self.stages
    }

    pub fn stage(&self, index: usize) -> Option<&'static StageDefinition> {
        self.stages.get(index)
    }

    pub fn stage_by_key(&self, key: &str) -> Option<&'static StageDefinition> {
        self.stages.iter().find(|s| s.key == key)
    }

    /// Zero-based position of the stage with the given key.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.key == key)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Number of checklist items across all stages.
    pub fn total_criteria(&self) -> usize {
        self.stages.iter().map(|s| s.criteria.len()).sum()
    }

    /// Best possible total score (`stage count × 5`).
    pub fn max_score(&self) -> u32 {
        self.stages.len() as u32 * MAX_STAGE_SCORE
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::standard()
    }
}

const STAGES: &[StageDefinition] = &[
    StageDefinition {
        key: "bienvenue",
        title: "Bienvenue & Confirmation",
        criteria: &[
            "Accueil personnalisé",
            "Présentation",
            "Pertinence du produit confirmée",
            "Gestion de l’objection \"occupé\"",
        ],
    },
    StageDefinition {
        key: "objections-initiales",
        title: "Objections Initiales",
        criteria: &[
            "Réponse à « je n’ai pas commandé / je regarde seulement »",
            "Explication du processus",
            "Ton amical maintenu",
        ],
    },
    StageDefinition {
        key: "besoins",
        title: "Identification des Besoins",
        criteria: &[
            "Questions sur la fréquence/type de douleur",
            "Enflure/localisation",
            "Âge",
            "Résumé du problème",
            "Accord du client",
        ],
    },
    StageDefinition {
        key: "produit",
        title: "Présentation du Produit",
        criteria: &[
            "Explication étape par étape",
            "Ingrédients naturels",
            "Soulagement + bénéfices long terme",
            "Lien avec besoins",
        ],
    },
    StageDefinition {
        key: "cures",
        title: "Préparation des Cures",
        criteria: &[
            "Importance de la cure complète",
            "Différencier essai / basique / complet",
            "Recommandation adaptée",
            "Présenté comme solution long terme",
        ],
    },
    StageDefinition {
        key: "prix-objections",
        title: "Prix & Gestion des Objections",
        criteria: &[
            "Réponse à « trop cher »",
            "Réponse à « 1 seul paquet »",
            "Réassurance",
            "Urgence avec promotions",
        ],
    },
    StageDefinition {
        key: "finalisation",
        title: "Finalisation de la Vente",
        criteria: &[
            "Récapitulatif de commande",
            "Prix total confirmé",
            "Détails de livraison collectés",
            "Méthode de paiement confirmée",
            "Délai communiqué",
            "Satisfaction renforcée",
        ],
    },
];
