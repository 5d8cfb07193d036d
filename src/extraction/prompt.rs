/// Instruction prompt sent alongside the prescription image. The JSON
/// skeleton below is the contract `parser` relies on; keep them in sync.
pub const ANALYSIS_PROMPT: &str = r#"You are an expert medical prescription analyzer. Carefully examine this prescription image and extract ALL visible medical information.

Look for:
- Doctor's name, clinic, specialization
- Patient information
- Diagnosis or medical condition
- ALL medications with exact names, dosages, frequencies, durations
- Any special instructions or notes

Provide a comprehensive analysis in this EXACT JSON format:

{
  "extractedData": {
    "doctorInfo": {
      "name": "[Doctor's full name if visible]",
      "clinic": "[Clinic/hospital name if visible]",
      "specialization": "[Medical specialization if mentioned]"
    },
    "patientInfo": {
      "name": "[Patient name if visible]",
      "age": "[Age if mentioned]"
    },
    "diagnosis": "[Primary medical condition/diagnosis]",
    "medications": [
      {
        "name": "[Exact medication name]",
        "dosage": "[Exact dosage amount]",
        "frequency": "[How often to take]",
        "duration": "[How long to take]",
        "instructions": "[Special instructions]"
      }
    ],
    "additionalNotes": "[Any other important medical notes]"
  },
  "explanation": {
    "reminders": [
      {
        "medicine": "[Medication name]",
        "times": ["08:00", "20:00"],
        "withFood": true,
        "duration": "[Number of days]"
      }
    ]
  }
}

Extract REAL data from the prescription image. Return ONLY the JSON object."#;
