mod submission_dto;

pub use submission_dto::{
    CreateReportFormDto, DraftLocationDto, DraftPhotoDto, DraftResponseDto, SelectCategoryDto,
    SetDescriptionDto, SetLocationDto, SubmissionReceiptDto, UploadPhotoDto,
};
