//! Claim module - the fixed reference table papers are analysed against
//!
//! The table is immutable reference data: 50 numbered statements, each in one
//! of six categories. Numbers are stable identifiers; artifacts refer to claims
//! only by number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of reference claims
pub const CLAIM_COUNT: u8 = 50;

/// A validated claim number in `1..=50`
///
/// Construction and deserialization both reject out-of-range values, so any
/// `ClaimNumber` in hand indexes the reference table.
///
/// # Examples
///
/// ```
/// use claimscope_domain::ClaimNumber;
///
/// let n = ClaimNumber::new(12).unwrap();
/// assert_eq!(n.get(), 12);
/// assert!(ClaimNumber::new(0).is_none());
/// assert!(ClaimNumber::new(51).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ClaimNumber(u8);

impl ClaimNumber {
    /// Create a claim number, returning `None` outside `1..=50`
    pub fn new(value: u8) -> Option<Self> {
        (1..=CLAIM_COUNT).contains(&value).then_some(Self(value))
    }

    /// Parse a user-supplied string such as `"12"` or `" 7 "`
    pub fn parse(input: &str) -> Option<Self> {
        input.trim().parse::<u8>().ok().and_then(Self::new)
    }

    /// Raw number
    pub fn get(self) -> u8 {
        self.0
    }

    /// Every claim number in ascending order
    pub fn all() -> impl Iterator<Item = ClaimNumber> {
        (1..=CLAIM_COUNT).map(ClaimNumber)
    }

    /// Reference entry for this number
    pub fn claim(self) -> &'static Claim {
        &CLAIMS[usize::from(self.0 - 1)]
    }
}

impl TryFrom<u8> for ClaimNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
            .ok_or_else(|| format!("claim number {} out of range 1..={}", value, CLAIM_COUNT))
    }
}

impl From<ClaimNumber> for u8 {
    fn from(n: ClaimNumber) -> u8 {
        n.0
    }
}

impl fmt::Display for ClaimNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Topic category a claim belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Broadcast, workspace and system-wide availability of content
    GlobalIntegration,
    /// Recurrence, oscillation and timing
    RecurrentDynamics,
    /// Higher-order representation, metacognition and self-models
    HigherOrder,
    /// Attention, gating and routing of information
    SelectiveRouting,
    /// Bodily, affective and valence-related processing
    EmbodimentAffect,
    /// Empirical markers and causal interventions
    MeasurementCausal,
}

impl Category {
    /// All categories in table order
    pub const ALL: [Category; 6] = [
        Category::GlobalIntegration,
        Category::RecurrentDynamics,
        Category::HigherOrder,
        Category::SelectiveRouting,
        Category::EmbodimentAffect,
        Category::MeasurementCausal,
    ];

    /// Human-readable category name
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::GlobalIntegration => "Global Integration & Access",
            Category::RecurrentDynamics => "Recurrent & Temporal Dynamics",
            Category::HigherOrder => "Higher-Order & Self-Modelling",
            Category::SelectiveRouting => "Attention & Selective Routing",
            Category::EmbodimentAffect => "Embodiment, Affect & Valence",
            Category::MeasurementCausal => "Measurement & Causal Signatures",
        }
    }

    /// Claims in this category, in number order
    pub fn claims(self) -> impl Iterator<Item = &'static Claim> {
        CLAIMS.iter().filter(move |c| c.category == self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One reference claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    /// Claim number (1-based, matches position in [`CLAIMS`])
    pub number: u8,
    /// Topic category
    pub category: Category,
    /// Canonical wording
    pub text: &'static str,
}

impl Claim {
    /// Look up a claim by raw number
    pub fn lookup(number: u8) -> Option<&'static Claim> {
        ClaimNumber::new(number).map(ClaimNumber::claim)
    }
}

const fn claim(number: u8, category: Category, text: &'static str) -> Claim {
    Claim {
        number,
        category,
        text,
    }
}

use Category::*;

/// The 50 reference claims
pub static CLAIMS: [Claim; CLAIM_COUNT as usize] = [
    claim(1, GlobalIntegration, "Conscious access corresponds to global broadcast of content to many specialised processors."),
    claim(2, GlobalIntegration, "A capacity-limited workspace selects which content becomes globally available."),
    claim(3, GlobalIntegration, "Ignition, a sudden non-linear rise in widespread activity, marks entry of content into awareness."),
    claim(4, GlobalIntegration, "Long-range frontoparietal connectivity is required for reportable experience."),
    claim(5, GlobalIntegration, "Integrated information, the irreducibility of a system's cause-effect structure, tracks the level of consciousness."),
    claim(6, GlobalIntegration, "Binding of features into unified objects depends on integration across distributed areas."),
    claim(7, GlobalIntegration, "Unconscious processing remains local and fails to reach system-wide availability."),
    claim(8, GlobalIntegration, "Hub regions coordinate the exchange of information between otherwise segregated modules."),
    claim(9, GlobalIntegration, "Artificial architectures with a shared latent bottleneck exhibit workspace-like access dynamics."),
    claim(10, RecurrentDynamics, "Recurrent feedback processing, not the feedforward sweep alone, is necessary for conscious perception."),
    claim(11, RecurrentDynamics, "Gamma-band synchrony contributes to binding of perceptual content."),
    claim(12, RecurrentDynamics, "Thalamocortical loops pace and sustain conscious states."),
    claim(13, RecurrentDynamics, "Metastable switching between network states underlies the stream of experience."),
    claim(14, RecurrentDynamics, "Cross-frequency coupling organises the temporal structure of cognitive content."),
    claim(15, RecurrentDynamics, "Conscious moments are discretised into perceptual frames of limited duration."),
    claim(16, RecurrentDynamics, "Sustained reverberant activity maintains content in awareness over time."),
    claim(17, RecurrentDynamics, "Recurrent computation in artificial networks produces dynamics analogous to biological reverberation."),
    claim(18, HigherOrder, "A state is conscious when it is the target of an appropriate higher-order representation."),
    claim(19, HigherOrder, "Metacognitive confidence signals are dissociable from first-order task performance."),
    claim(20, HigherOrder, "Prefrontal regions support the higher-order monitoring associated with awareness."),
    claim(21, HigherOrder, "The brain maintains a simplified model of its own attention that grounds reports of awareness."),
    claim(22, HigherOrder, "A self-model that integrates bodily and narrative information underlies the sense of self."),
    claim(23, HigherOrder, "Introspective reports can be systematically inaccurate about underlying processing."),
    claim(24, HigherOrder, "Artificial systems can learn calibrated estimates of their own uncertainty."),
    claim(25, HigherOrder, "Internal representations in language models encode information about the model's own states."),
    claim(26, HigherOrder, "Reportability and phenomenal experience can come apart."),
    claim(27, SelectiveRouting, "Attention and consciousness are distinct processes that can be dissociated."),
    claim(28, SelectiveRouting, "Thalamic nuclei such as the pulvinar gate information flow between cortical areas."),
    claim(29, SelectiveRouting, "Inhibitory interneuron classes implement gain control over which signals propagate."),
    claim(30, SelectiveRouting, "Neuromodulatory systems regulate global arousal and thereby the capacity for awareness."),
    claim(31, SelectiveRouting, "Top-down predictions select and amplify expected sensory content."),
    claim(32, SelectiveRouting, "Attention mechanisms in transformers implement a form of selective routing."),
    claim(33, SelectiveRouting, "Mixture-of-experts gating dynamically allocates processing to specialised submodules."),
    claim(34, SelectiveRouting, "Masking and gating modules limit which representations influence downstream output."),
    claim(35, EmbodimentAffect, "Interoceptive signals from the body shape the content and intensity of experience."),
    claim(36, EmbodimentAffect, "Affective valence is a core dimension of conscious states."),
    claim(37, EmbodimentAffect, "Brainstem and midbrain structures are sufficient for basic affective consciousness."),
    claim(38, EmbodimentAffect, "Predictive regulation of bodily states underlies emotion and selfhood."),
    claim(39, EmbodimentAffect, "Persistent negative states, not momentary signals, are the relevant marker of suffering."),
    claim(40, EmbodimentAffect, "Pain experience depends on coupling between sensory and affective-evaluative networks."),
    claim(41, EmbodimentAffect, "Reward and value signals in learning systems are computationally analogous to affect."),
    claim(42, EmbodimentAffect, "Sensorimotor contingencies constitute part of perceptual experience."),
    claim(43, MeasurementCausal, "Perturbational complexity reliably distinguishes conscious from unconscious states."),
    claim(44, MeasurementCausal, "Signal diversity or entropy of neural activity increases with conscious level."),
    claim(45, MeasurementCausal, "Neural dynamics near criticality support conscious processing."),
    claim(46, MeasurementCausal, "Late event-related components such as the P3b index conscious access."),
    claim(47, MeasurementCausal, "No-report paradigms reveal neural correlates distinct from those of reporting."),
    claim(48, MeasurementCausal, "Direct stimulation or lesion of specific regions causally alters conscious content."),
    claim(49, MeasurementCausal, "Activation patching and ablation reveal causally relevant internal representations in neural networks."),
    claim(50, MeasurementCausal, "Anaesthetics abolish consciousness by disrupting large-scale integration rather than local activity."),
];
