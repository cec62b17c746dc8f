mod report_dto;

pub use report_dto::{
    ReportResponseDto, StatusHistoryResponseDto, TrackedCategoryDto, TrackingResponseDto,
    UpdateReportStatusDto,
};
