// src/models/api.rs

use serde::Deserialize;

// --- QQ 音乐歌曲详情 (music.pf_song_detail_svr.get_song_detail_yqq) 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct QqSongDetailData {
    pub track_info: QqTrackInfo,
}

#[derive(Deserialize, Debug, Clone)]
pub struct QqTrackInfo {
    pub mid: String,
    // name 与 title 通常同时存在且相同，取 name，缺失时退回 title
    pub name: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub singer: Vec<QqSinger>,
    pub album: Option<QqAlbum>,
    pub file: Option<QqFileInfo>,
}

impl QqTrackInfo {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_default()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct QqSinger {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct QqAlbum {
    pub mid: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct QqFileInfo {
    pub media_mid: Option<String>,
}

// --- QQ 音乐取链 (vkey.GetVkeyServer.CgiGetVkey) 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct QqVkeyData {
    #[serde(default)]
    pub midurlinfo: Vec<QqMidUrlInfo>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct QqMidUrlInfo {
    #[serde(default)]
    pub purl: String,
}

// --- QQ 音乐 CDN 调度 (CDN_UGC.GetCdnDispatch) 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct QqCdnDispatchData {
    #[serde(default)]
    pub vkey: String,
}

// --- 网易云音乐歌曲详情 (/api/song/detail) 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct NeteaseSongDetailResponse {
    #[serde(default)]
    pub songs: Vec<NeteaseSong>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NeteaseSong {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<NeteaseArtist>,
    pub album: Option<NeteaseAlbum>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NeteaseArtist {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NeteaseAlbum {
    #[serde(rename = "picUrl", default)]
    pub pic_url: String,
}
