mod map_dto;

pub use map_dto::{
    IconDescriptorDto, IconQuery, MapLayerDto, MapMode, MapPointsQuery, MarkerDto,
};
