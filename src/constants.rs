// src/constants.rs

pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CACHE_FILE_NAME: &str = "track-cache.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_NOTES_DIR: &str = "music-data";
pub const CACHE_CAPACITY: usize = 10_000;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// 没有任何可用笔记时返回的保底响应内容
pub const FALLBACK_MUSIC_ID: &str = "101126";
pub const FALLBACK_TITLE: &str = "暂无推荐";
pub const FALLBACK_CONTENT: &str = "库里还没有任何音乐推荐哦~";

pub mod qq {
    pub const API_BASE: &str = "https://u.y.qq.com";
    pub const MUSICU_PATH: &str = "/cgi-bin/musicu.fcg";
    pub const REFERER: &str = "https://y.qq.com/";

    pub const SONG_DETAIL_MODULE: &str = "music.pf_song_detail_svr";
    pub const SONG_DETAIL_METHOD: &str = "get_song_detail_yqq";
    pub const VKEY_MODULE: &str = "vkey.GetVkeyServer";
    pub const VKEY_METHOD: &str = "CgiGetVkey";
    pub const CDN_DISPATCH_MODULE: &str = "CDN_UGC";
    pub const CDN_DISPATCH_METHOD: &str = "GetCdnDispatch";

    // vkey 授权的固定 CDN 主机，两条取链路径共用
    pub const STREAM_HOST: &str = "https://isure.stream.qqmusic.qq.com/";
    pub const STREAM_URL_TAIL: &str = "&uin=0&fromtag=66";
    pub const QUALITY_PREFIX: &str = "M500";
    pub const AUDIO_EXT: &str = ".mp3";

    pub const ALBUM_COVER_BASE: &str = "https://y.gtimg.cn/music/photo_new/";
    pub const ALBUM_COVER_SIZE: u32 = 300;
}

pub mod netease {
    pub const API_BASE: &str = "https://music.163.com";
    pub const SONG_DETAIL_PATH: &str = "/api/song/detail";
    pub const REFERER: &str = "https://music.163.com/";

    // 外链播放地址是 ID 的纯函数，不需要请求接口
    pub const OUTER_STREAM_BASE: &str = "https://music.163.com/song/media/outer/url?id=";
}
