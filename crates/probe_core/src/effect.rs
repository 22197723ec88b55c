#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob {
        file: crate::FileMeta,
        service: crate::OcrService,
    },
    CancelJob,
}
