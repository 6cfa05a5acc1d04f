pub mod comment;
pub mod dashboard;
pub mod like;
pub mod pagination;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

pub use comment::{Comment, CommentWithOwner, CreateCommentRequest, UpdateCommentRequest};
pub use dashboard::ChannelStats;
pub use like::{LikedVideo, ToggleOutcome};
pub use pagination::PageQuery;
pub use subscription::{ChannelSubscriber, SubscribedChannel};
pub use tweet::{CreateTweetRequest, Tweet, UpdateTweetRequest};
pub use user::{
    ChangePasswordRequest, ChannelProfile, LoginRequest, RefreshTokenRequest, RegisterInput,
    UpdateAccountRequest, User, UserResponse,
};
pub use video::{OwnerSummary, Video, VideoListQuery, VideoWithOwner, WatchHistoryEntry};
