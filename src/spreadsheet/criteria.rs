use crate::error::ReadError;
use glob::Pattern;

/// Selects which worksheet of a workbook is read.
#[derive(Clone, Debug, Default)]
pub(crate) struct Criteria {
    /// Sheet name pattern; `None` selects the first worksheet.
    pub(crate) sheet_name_pattern: Option<Pattern>,
}

impl Criteria {
    pub(crate) fn new(sheet_name_pattern: Option<&str>) -> Result<Self, ReadError> {
        let sheet_name_pattern = sheet_name_pattern.map(Pattern::new).transpose()?;
        Ok(Criteria { sheet_name_pattern })
    }

    /// Returns true if no pattern is set or the name matches it.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        self.sheet_name_pattern
            .as_ref()
            .map(|pattern| pattern.matches(sheet_name))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_sheet_names() {
        let criteria = Criteria::new(None).unwrap();
        assert!(criteria.accept("Sheet1"));

        let criteria = Criteria::new(Some("Line*")).unwrap();
        assert!(criteria.accept("Line 3"));
        assert!(!criteria.accept("Summary"));
    }

    #[test]
    fn invalid_pattern() {
        assert!(Criteria::new(Some("[")).is_err());
    }
}
