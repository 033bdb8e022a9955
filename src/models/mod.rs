pub mod case_study;
pub mod progress;
pub mod report;

pub use case_study::{
    Attempt, AttemptStatus, CaseStudy, CaseStudyModule, Enrollment, EnrollmentStudent, Exercise,
    FinalSubmission, ReadStatus,
};
pub use progress::{
    CaseStudyProgress, ConsolidatedStudentView, ExerciseProgress, ModuleProgress, NavigationResult,
};
pub use report::{FailedReportParts, GenerationRequestPayload, ReportType, Ticker};
