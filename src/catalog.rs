/// The twenty standard amino acids, in the order they are reported.
pub const STANDARD_AMINO_ACIDS: [&str; 20] = [
    "Ala", "Gly", "Pro", "Thr", "Val", "Ser", "Arg", "Leu", "Phe", "Asn", "Lys", "Asp", "Glu",
    "His", "Gln", "Ile", "Met", "Tyr", "Cys", "Trp",
];

/// Ordered set of three-letter amino-acid codes tracked per report.
///
/// Stop codons, selenocysteine and suppressor isotypes are not
/// part of the standard catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AminoAcidCatalog {
    codes: Vec<String>,
}

impl AminoAcidCatalog {
    /// Build a catalog from arbitrary codes. Duplicates are dropped, keeping
    /// the first occurrence.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = vec![];
        for code in codes.into_iter().map(Into::into) {
            if !unique.contains(&code) {
                unique.push(code);
            }
        }
        Self { codes: unique }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_AMINO_ACIDS)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    /// Index of `code` in catalog order.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.codes.iter().position(|c| c == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.codes.iter().map(String::as_str)
    }
}

impl Default for AminoAcidCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
