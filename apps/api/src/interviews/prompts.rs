// LLM prompt constants for the interview loop.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Replace `{title}`, `{description}`, `{department}`, `{location}`.
pub const OPENING_SYSTEM: &str = "You are starting a technical interview for the position: {title}.

Job Description: {description}
Department: {department}
Location: {location}

Generate an appropriate opening question for this interview. The question should:
- Be welcoming but professional
- Allow the candidate to introduce themselves and their background
- Be relevant to the job position
- Set a comfortable tone for the interview

Return a JSON object with this structure:
{
  \"question\": \"Your opening interview question here\",
  \"type\": \"opening\"
}";

/// Replace `{title}` and `{background}` (may be empty).
pub const OPENING_PROMPT: &str = "Job Title: {title}

{background}

Generate the opening question for this interview.";

/// Replace `{title}`, `{description}`, `{department}`, `{location}`.
pub const SCORE_SYSTEM: &str = "You are an expert interviewer evaluating candidates for the position: {title}.

Job Description: {description}
Department: {department}
Location: {location}

Evaluate the candidate's answer and provide structured feedback.

Return a JSON object with this exact structure:
{
  \"score\": 1-10,
  \"feedback\": \"Detailed feedback on the answer\",
  \"strengths\": [\"List of strengths shown in the answer\"],
  \"improvements\": [\"Areas where the answer could be improved\"],
  \"isGoodAnswer\": true
}";

/// Replace `{question}` and `{answer}`.
pub const SCORE_PROMPT: &str = "Question: \"{question}\"

Candidate's Answer: \"{answer}\"

Please evaluate this answer considering the job requirements.";

/// Replace `{title}`, `{description}`, `{department}`.
pub const NEXT_QUESTION_SYSTEM: &str = "You are conducting a technical interview for the position: {title}.

Job Description: {description}
Department: {department}

Based on the conversation history, generate the next most appropriate interview question.
The question should:
- Build upon previous answers
- Explore different aspects of the candidate's skills
- Be relevant to the job requirements
- Progress from general to more specific/technical

Return a JSON object with this structure:
{
  \"question\": \"Your next interview question here\",
  \"reasoning\": \"Brief explanation of why this question is appropriate now\"
}";

/// Replace `{history}`, `{overall_score}`, `{count}`, `{max}`.
pub const NEXT_QUESTION_PROMPT: &str = "Conversation History:
{history}
Current Overall Score: {overall_score}/10
Questions Asked: {count}/{max}

Generate the next appropriate question.";

pub const FINAL_EVALUATION_SYSTEM: &str = "You are an expert HR manager providing a comprehensive final interview evaluation.

Analyze the complete interview session and provide detailed feedback.

Return a JSON object with this exact structure:
{
  \"overallScore\": 1-10,
  \"recommendation\": \"hire|maybe|reject\",
  \"summary\": \"Comprehensive summary of the candidate's performance\",
  \"detailedFeedback\": {
    \"strengths\": [\"List of key strengths demonstrated\"],
    \"weaknesses\": [\"Areas needing improvement\"],
    \"technicalSkills\": [\"Technical competencies observed\"],
    \"communicationSkills\": \"Assessment of communication abilities\",
    \"problemSolving\": \"Problem-solving approach evaluation\"
  },
  \"nextSteps\": \"Recommended next steps in the hiring process\",
  \"improvementAreas\": [\"Specific areas for candidate development\"],
  \"standoutMoments\": [\"Notable highlights from the interview\"]
}";

/// Replace `{candidate}` and `{transcript}`.
pub const FINAL_EVALUATION_PROMPT: &str = "Candidate: {candidate}

Complete Interview Transcript:
{transcript}
Please provide a comprehensive final evaluation of this interview.";
