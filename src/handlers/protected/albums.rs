use axum::{extract::Path, Extension, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Album, Image};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadRequest {
    pub album_name: Option<String>,
    pub images: Vec<String>,
}

/// Images taken on one calendar day, newest day first in the album view.
#[derive(Debug, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub images: Vec<Image>,
}

#[derive(Debug, Serialize)]
pub struct AlbumDetail {
    pub album: Album,
    pub images: Vec<Image>,
    pub days: Vec<DayGroup>,
}

/// GET /api/albums - The caller's albums.
pub async fn list(Extension(current_user): Extension<CurrentUser>) -> ApiResult<Vec<Album>> {
    let pool = DatabaseManager::pool().await?;
    let albums = Album::list_owned(&pool, current_user.id).await?;
    Ok(ApiResponse::success(albums))
}

/// GET /api/album/:albumName - The caller's album with its images, flat and
/// grouped by upload calendar date.
pub async fn get(
    Extension(current_user): Extension<CurrentUser>,
    Path(album_name): Path<String>,
) -> ApiResult<AlbumDetail> {
    let pool = DatabaseManager::pool().await?;

    let album = Album::find_owned_by_name(&pool, current_user.id, &album_name)
        .await?
        .ok_or_else(|| ApiError::not_found("Album not found"))?;
    let images = Image::list_for_album(&pool, album.id).await?;
    let days = group_by_day(&images);

    Ok(ApiResponse::success(AlbumDetail { album, images, days }))
}

/// POST /api/images - Record already-hosted image URLs under an album,
/// creating the album on first use, and return the refreshed album.
pub async fn upload(
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UploadRequest>,
) -> ApiResult<AlbumDetail> {
    let album_name = payload
        .album_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("albumName is required"))?;

    if payload.images.is_empty() {
        return Err(ApiError::bad_request("At least one image URL is required"));
    }
    if payload.images.iter().any(|url| url.trim().is_empty()) {
        return Err(ApiError::bad_request("Image URLs cannot be empty"));
    }

    let pool = DatabaseManager::pool().await?;
    let album = Album::find_or_create(&pool, current_user.id, album_name).await?;
    Image::insert_many(&pool, album.id, current_user.id, &payload.images).await?;

    // Return the refreshed album, as the client re-fetches after upload
    let images = Image::list_for_album(&pool, album.id).await?;
    let days = group_by_day(&images);

    Ok(ApiResponse::created(AlbumDetail { album, images, days }))
}

/// Fold a chronological image list into per-calendar-day groups, newest day
/// first. Order within a day is preserved.
fn group_by_day(images: &[Image]) -> Vec<DayGroup> {
    let mut days: Vec<DayGroup> = Vec::new();

    for image in images {
        let date = image.created_at.date_naive();
        match days.iter_mut().find(|g| g.date == date) {
            Some(group) => group.images.push(image.clone()),
            None => days.push(DayGroup {
                date,
                images: vec![image.clone()],
            }),
        }
    }

    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn image_at(ts: &str) -> Image {
        Image {
            id: Uuid::new_v4(),
            album_id: Uuid::new_v4(),
            url: format!("https://cdn.example.com/{}.png", ts),
            uploader: Uuid::new_v4(),
            created_at: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
        }
    }

    #[test]
    fn groups_images_by_calendar_date() {
        let images = vec![
            image_at("2026-08-01 09:00:00"),
            image_at("2026-08-01 18:30:00"),
            image_at("2026-08-03 07:15:00"),
        ];

        let days = group_by_day(&images);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        assert_eq!(days[0].images.len(), 1);
        assert_eq!(days[1].images.len(), 2);
    }

    #[test]
    fn newest_day_comes_first_and_order_within_day_is_preserved() {
        let first = image_at("2026-08-02 08:00:00");
        let second = image_at("2026-08-02 20:00:00");
        let older = image_at("2026-07-30 12:00:00");

        let days = group_by_day(&[older.clone(), first.clone(), second.clone()]);
        assert_eq!(days[0].images[0].url, first.url);
        assert_eq!(days[0].images[1].url, second.url);
        assert_eq!(days[1].images[0].url, older.url);
    }

    #[test]
    fn empty_album_has_no_groups() {
        assert!(group_by_day(&[]).is_empty());
    }
}
