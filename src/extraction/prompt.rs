//! The instruction prompt for prescription transcription.

/// Instruction prompt sent alongside the prescription image.
///
/// The model does all the heavy lifting: OCR of handwriting, correction of
/// misread medical terms against known drug/test names, and dosage-quantity
/// arithmetic (including Bangla numerals and number words, normalized to
/// Arabic numerals). The reply must follow the labeled-section format below,
/// which [`crate::extraction::parser`] depends on.
pub const EXTRACTION_PROMPT: &str = "\
You are an assistant specializing in reading handwritten medical prescriptions. \
From the uploaded prescription image:

1. Extract the doctor's name, if clearly written.
2. Extract the disease or diagnosis, if one is mentioned.
3. Extract every medicine name. Cross-check each name against known \
medications and correct handwriting misreads, but never invent a medicine \
that is not visible in the image.
4. For each medicine, include the dosage strength when written (format: \
<Medicine Name> <Number> mg) and the prescribed quantity in pieces (format: \
<Medicine Name> <Number> mg (<number> of Pieces)). Quantities may be written \
in English or Bangla; convert Bangla numerals and number words to Arabic \
numerals. If a dosage value is invalid, output only the medicine name.
5. Extract any prescribed medical tests (e.g. Blood Test, X-ray, MRI, CBC).

Reply using exactly this format, with no bold text and no commentary:

Doctor: <Doctor's Name>
Disease: <Disease Name>
Medicines:
1. <Medicine Name> <Number> mg (<number> of Pieces)
2. <Medicine Name> (<number> of Pieces)
Tests:
1. <Test Name>

If a field cannot be read from the image, write Not Found for it instead of \
an error message.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_every_section_header() {
        for header in ["Doctor:", "Disease:", "Medicines:", "Tests:"] {
            assert!(EXTRACTION_PROMPT.contains(header), "missing {header}");
        }
    }

    #[test]
    fn prompt_specifies_fallback_literal() {
        assert!(EXTRACTION_PROMPT.contains("Not Found"));
    }
}
